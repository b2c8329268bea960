// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Abstract Syntax Tree types for the configuration language (§3
//! "Configuration AST").

use ncd_core::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub processes: Vec<ProcessDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    pub name: String,
    pub is_template: bool,
    pub statements: Vec<Statement>,
    pub span: Span,
}

/// A dotted identifier chain, e.g. `net.ipv4.addr` or a single `IDENT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DottedName {
    pub segments: Vec<String>,
    pub span: Span,
}

impl DottedName {
    pub fn single(segment: impl Into<String>, span: Span) -> Self {
        Self { segments: vec![segment.into()], span }
    }

    pub fn to_dotted_string(&self) -> String {
        self.segments.join(".")
    }

    pub fn first(&self) -> &str {
        self.segments.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// `a.b.c ->` prefix, naming the object the statement instantiates onto.
    pub object_prefix: Option<DottedName>,
    /// The module type string, e.g. `call` or `net.ipv4.addr`.
    pub method: DottedName,
    pub args: Vec<Expr>,
    /// Explicit label, if the statement source named one.
    pub label: Option<String>,
    pub span: Span,
}

impl Statement {
    /// The effective label used for backward-visibility lookups: the
    /// explicit label, or the auto-label derived from the dotted method
    /// name (§4.5 "Labels").
    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.method.segments.last().map(String::as_str).unwrap_or(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// A double-quoted string literal, already escape-decoded to raw bytes.
    Str(Vec<u8>, Span),
    /// A dotted variable reference.
    Var(DottedName),
    /// A nested `{ ... }` list of argument expressions.
    List(Vec<Expr>, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Str(_, span) => *span,
            Expr::Var(name) => name.span,
            Expr::List(_, span) => *span,
        }
    }
}

/// Renders a parsed [`Program`] back to canonical configuration-language
/// text. Only used by the round-trip test property (§8) — it normalizes
/// whitespace and never aims to reproduce the user's original formatting.
pub fn unparse(program: &Program) -> String {
    let mut out = String::new();
    for def in &program.processes {
        out.push_str(if def.is_template { "template " } else { "process " });
        out.push_str(&def.name);
        out.push_str(" {\n");
        for stmt in &def.statements {
            out.push_str("    ");
            unparse_statement(stmt, &mut out);
            out.push('\n');
        }
        out.push_str("}\n");
    }
    out
}

fn unparse_statement(stmt: &Statement, out: &mut String) {
    if let Some(prefix) = &stmt.object_prefix {
        out.push_str(&prefix.to_dotted_string());
        out.push_str(" -> ");
    }
    out.push_str(&stmt.method.to_dotted_string());
    out.push('(');
    for (i, arg) in stmt.args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        unparse_expr(arg, out);
    }
    out.push(')');
    if let Some(label) = &stmt.label {
        out.push(' ');
        out.push_str(label);
    }
    out.push(';');
}

fn unparse_expr(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Str(bytes, _) => {
            out.push('"');
            out.push_str(&escape_string(bytes));
            out.push('"');
        }
        Expr::Var(name) => out.push_str(&name.to_dotted_string()),
        Expr::List(items, _) => {
            out.push('{');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                unparse_expr(item, out);
            }
            out.push('}');
        }
    }
}

fn escape_string(bytes: &[u8]) -> String {
    let mut s = String::new();
    for &b in bytes {
        match b {
            b'\n' => s.push_str("\\n"),
            b'\t' => s.push_str("\\t"),
            b'\r' => s.push_str("\\r"),
            b'\\' => s.push_str("\\\\"),
            b'"' => s.push_str("\\\""),
            0x20..=0x7e => s.push(b as char),
            _ => s.push_str(&format!("\\x{b:02x}")),
        }
    }
    s
}

#[cfg(test)]
#[path = "ast_tests.rs"]
mod tests;
