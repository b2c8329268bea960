// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The interpreter engine (§4.5): the per-process Advance/Unwind work
//! routine, driven entirely off the Reactor's pending-job queue so no
//! statement or module callback ever re-enters the scheduler on its own
//! stack frame (§5 "no re-entry").
//!
//! Every function here that needs to hand a module a live callback handle,
//! or enqueue a reactor job that runs later, takes an explicit
//! `&Rc<EngineInner>` rather than a plain `&self` — that's the only Rc any
//! of this code ever needs, threaded down from [`Engine`]'s own `Rc` or
//! from a [`StatementRuntime`]'s stored clone of it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use ncd_core::{OwnedValue, StringId, Value, ValueArena};
use ncd_module::{Module, ModuleError, ModuleRuntime, SubProcessHandle, TemplateListener};
use ncd_parser::{Program, ProcessDefinition};
use ncd_runtime::{ProcessManager, Reactor};

use crate::context::Context;
use crate::error::EngineError;
use crate::process::{CallerRef, ProcessInstance, ProcessInstanceId, UnwindReason};
use crate::state::{Direction, StatementState};
use crate::vars;

/// The result of loading a configuration (§4.5 "Engine::load"): every
/// process/template definition, indexed by name and kept in source order
/// so the "main" bootstrap convention can fall back to "first process".
pub struct LoadedConfig {
    order: Vec<Rc<ProcessDefinition>>,
    by_name: HashMap<String, usize>,
}

impl LoadedConfig {
    pub(crate) fn build(program: &Program) -> Result<Self, EngineError> {
        let mut order = Vec::with_capacity(program.processes.len());
        let mut by_name = HashMap::with_capacity(program.processes.len());
        for def in &program.processes {
            if by_name.contains_key(&def.name) {
                return Err(EngineError::DuplicateProcessName { name: def.name.clone() });
            }
            by_name.insert(def.name.clone(), order.len());
            order.push(Rc::new(def.clone()));
        }
        Ok(Self { order, by_name })
    }

    pub fn process_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|def| def.name.as_str())
    }

    /// The "main" bootstrap convention (§6 "External interfaces"): the
    /// process named `main`, or failing that the first `process` (not
    /// `template`) definition in source order.
    pub fn default_root_name(&self) -> Option<&str> {
        if let Some(&index) = self.by_name.get("main") {
            if !self.order[index].is_template {
                return Some(self.order[index].name.as_str());
            }
        }
        self.order.iter().find(|def| !def.is_template).map(|def| def.name.as_str())
    }

    fn lookup(&self, name: &str) -> Option<Rc<ProcessDefinition>> {
        self.by_name.get(name).map(|&index| self.order[index].clone())
    }
}

/// A caller's handle to a running top-level process instance (§4.5
/// "Engine::start"). Distinct from `ncd_runtime`'s OS-process handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle(ProcessInstanceId);

impl ProcessHandle {
    pub fn id(&self) -> ProcessInstanceId {
        self.0
    }
}

/// How a process instance finished (§4.5 "termination"), reported to
/// whoever started it and, for sub-processes, mirrored to the calling
/// `call` statement.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    Completed,
    Aborted(String),
}

struct TemplateLink {
    child: ProcessInstanceId,
    listener: RefCell<TemplateListener>,
}

/// A snapshot of the fields `step_once` needs to decide what to do next,
/// taken under a single short-lived borrow so the dispatch itself never
/// holds a `ProcessInstance` borrow across a module call.
struct StepSnapshot {
    direction: Direction,
    cursor: usize,
    len: usize,
    unwind_reason: Option<UnwindReason>,
}

pub(crate) struct EngineInner {
    pub(crate) context: Context,
    config: LoadedConfig,
    processes: RefCell<HashMap<ProcessInstanceId, RefCell<ProcessInstance>>>,
    sub_processes: RefCell<HashMap<SubProcessHandle, TemplateLink>>,
    child_to_handle: RefCell<HashMap<ProcessInstanceId, SubProcessHandle>>,
    next_sub_handle: Cell<u64>,
    completion_hooks: RefCell<HashMap<ProcessInstanceId, Vec<Box<dyn FnOnce(ProcessOutcome)>>>>,
}

impl EngineInner {
    pub(crate) fn new(context: Context, config: LoadedConfig) -> Self {
        Self {
            context,
            config,
            processes: RefCell::new(HashMap::new()),
            sub_processes: RefCell::new(HashMap::new()),
            child_to_handle: RefCell::new(HashMap::new()),
            next_sub_handle: Cell::new(0),
            completion_hooks: RefCell::new(HashMap::new()),
        }
    }

    /// Read-only access to one process instance by id, for variable
    /// resolution (§4.5) including the `_caller` cross-process fallback.
    pub(crate) fn with_process<T>(&self, id: ProcessInstanceId, f: impl FnOnce(&ProcessInstance) -> T) -> Option<T> {
        let processes = self.processes.borrow();
        processes.get(&id).map(|cell| f(&cell.borrow()))
    }

    fn start_process(
        engine: &Rc<EngineInner>,
        name: &str,
        args: Vec<OwnedValue>,
        caller: Option<CallerRef>,
    ) -> Result<ProcessInstanceId, EngineError> {
        let def = engine.config.lookup(name).ok_or_else(|| EngineError::UnknownProcess { name: name.to_string() })?;
        match (caller.is_some(), def.is_template) {
            (false, true) => return Err(EngineError::WrongProcessKind { name: name.to_string(), found: "template", expected: "process" }),
            (true, false) => return Err(EngineError::WrongProcessKind { name: name.to_string(), found: "process", expected: "template" }),
            _ => {}
        }
        let id = ProcessInstanceId::new();
        tracing::info!(process = %name, process_id = %id, template = def.is_template, "process instance starting");
        let instance = ProcessInstance::new(id, name.to_string(), def, args, caller);
        engine.processes.borrow_mut().insert(id, RefCell::new(instance));
        EngineInner::schedule_step(engine, id);
        Ok(id)
    }

    fn request_termination(engine: &Rc<EngineInner>, id: ProcessInstanceId) {
        EngineInner::trigger_rollback(engine, id, UnwindReason::Terminate);
    }

    fn trigger_rollback(engine: &Rc<EngineInner>, id: ProcessInstanceId, reason: UnwindReason) {
        let should_schedule = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let mut p = cell.borrow_mut();
                    let overrides = match (p.unwind_reason, reason) {
                        (None, _) => true,
                        (Some(UnwindReason::Terminate), _) => false,
                        (Some(UnwindReason::Down(_)), UnwindReason::Terminate) => true,
                        (Some(UnwindReason::Down(existing)), UnwindReason::Down(new)) => new < existing,
                    };
                    if overrides {
                        p.direction = Direction::Unwinding;
                        p.unwind_reason = Some(reason);
                    }
                    if reason == UnwindReason::Terminate {
                        p.terminating = true;
                    }
                    true
                }
                None => false,
            }
        };
        if should_schedule {
            EngineInner::schedule_step(engine, id);
        }
    }

    fn schedule_step(engine: &Rc<EngineInner>, id: ProcessInstanceId) {
        let should_enqueue = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let mut p = cell.borrow_mut();
                    if p.step_scheduled {
                        false
                    } else {
                        p.step_scheduled = true;
                        true
                    }
                }
                None => false,
            }
        };
        if should_enqueue {
            let engine = engine.clone();
            engine.context.reactor.enqueue_job(move || EngineInner::run_step(engine, id));
        }
    }

    fn run_step(engine: Rc<EngineInner>, id: ProcessInstanceId) {
        let exists = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    cell.borrow_mut().step_scheduled = false;
                    true
                }
                None => false,
            }
        };
        if exists {
            EngineInner::step_once(&engine, id);
        }
    }

    fn step_once(engine: &Rc<EngineInner>, id: ProcessInstanceId) {
        let snapshot = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let p = cell.borrow();
                    StepSnapshot { direction: p.direction, cursor: p.cursor, len: p.statements.len(), unwind_reason: p.unwind_reason }
                }
                None => return,
            }
        };
        match snapshot.direction {
            Direction::Advancing => EngineInner::advance(engine, id, &snapshot),
            Direction::Unwinding => EngineInner::unwind(engine, id, &snapshot),
        }
    }

    /// §4.5 "Advance": start the next Pending statement, or report
    /// quiescence once the cursor has passed the last one.
    fn advance(engine: &Rc<EngineInner>, id: ProcessInstanceId, snapshot: &StepSnapshot) {
        if snapshot.cursor >= snapshot.len {
            engine.on_quiescent(id);
            return;
        }
        let state = engine.with_process(id, |p| p.statements[snapshot.cursor].state);
        if state == Some(StatementState::Pending) {
            EngineInner::advance_pending(engine, id, snapshot.cursor);
        }
        // Starting: nothing to do, waiting on backend_up/backend_error.
        // Up/Dying/Forgotten at the cursor during Advancing never happens
        // per the monotone-prefix invariant; treated as a no-op rather
        // than panicking on a config-independent defect.
    }

    fn advance_pending(engine: &Rc<EngineInner>, id: ProcessInstanceId, cursor: usize) {
        let arena = ValueArena::new();
        let mut type_name = String::new();
        let eval = {
            let processes = engine.processes.borrow();
            let Some(cell) = processes.get(&id) else { return };
            let process = cell.borrow();
            let Some(stmt_ast) = process.definition.statements.get(cursor) else {
                return;
            };
            type_name = stmt_ast.method.to_dotted_string();
            vars::eval_args(engine, &process, cursor, &arena, &stmt_ast.args)
        };
        let values = match eval {
            Ok(values) => values,
            Err(err) => {
                EngineInner::fail_statement(engine, id, cursor, err.to_string());
                return;
            }
        };
        let Some(factory) = engine.context.registry.lookup(&type_name) else {
            EngineInner::fail_statement(engine, id, cursor, EngineError::ModuleTypeUnknown { type_name }.to_string());
            return;
        };
        let owned: Vec<OwnedValue> = values.iter().map(|v| OwnedValue::from(*v)).collect();
        engine.set_statement_starting(id, cursor, owned);
        let ctx = EngineInner::make_runtime(engine, id, cursor);
        match factory(&values, ctx) {
            Ok(module) => engine.store_module(id, cursor, module),
            Err(err) => EngineInner::fail_statement(engine, id, cursor, err.to_string()),
        }
    }

    fn fail_statement(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize, message: String) {
        {
            let processes = engine.processes.borrow();
            if let Some(cell) = processes.get(&id) {
                let mut p = cell.borrow_mut();
                tracing::error!(process = %p.name, statement = index, %message, "statement failed; aborting process");
                p.statements[index].state = StatementState::Forgotten;
                p.statements[index].module = None;
                p.aborted = Some(message);
            }
        }
        EngineInner::trigger_rollback(engine, id, UnwindReason::Terminate);
    }

    /// §4.5 "Unwind step": tear down the highest non-`Forgotten` index
    /// above the unwind target, one statement per turn.
    fn unwind(engine: &Rc<EngineInner>, id: ProcessInstanceId, snapshot: &StepSnapshot) {
        let target_bound = match snapshot.unwind_reason {
            Some(UnwindReason::Down(t)) => t + 1,
            Some(UnwindReason::Terminate) | None => 0,
        };
        let action = engine.with_process(id, |p| {
            (target_bound..p.statements.len()).rev().find_map(|i| {
                let state = p.statements[i].state;
                (state != StatementState::Forgotten).then_some((i, state))
            })
        });
        match action.flatten() {
            Some((i, StatementState::Pending)) => {
                engine.set_statement_state(id, i, StatementState::Forgotten);
                EngineInner::schedule_step(engine, id);
            }
            Some((i, StatementState::Up)) => EngineInner::die_statement(engine, id, i),
            Some((_, StatementState::Starting)) | Some((_, StatementState::Dying)) => {
                // Waiting on backend_up/backend_error (Starting) or
                // backend_dead (Dying); the eventual handler re-schedules.
            }
            Some((_, StatementState::Forgotten)) | None => {
                EngineInner::unwind_complete(engine, id, snapshot.unwind_reason);
            }
        }
    }

    fn die_statement(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize) {
        let module = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let mut p = cell.borrow_mut();
                    p.statements[index].state = StatementState::Dying;
                    p.statements[index].module.take()
                }
                None => return,
            }
        };
        match module {
            Some(mut module) => {
                let ctx = EngineInner::make_runtime(engine, id, index);
                module.die(ctx);
            }
            None => EngineInner::handle_backend_dead(engine, id, index),
        }
    }

    fn unwind_complete(engine: &Rc<EngineInner>, id: ProcessInstanceId, reason: Option<UnwindReason>) {
        match reason {
            Some(UnwindReason::Down(t)) => {
                let processes = engine.processes.borrow();
                if let Some(cell) = processes.get(&id) {
                    let mut p = cell.borrow_mut();
                    if let Some(module) = p.statements[t].module.as_mut() {
                        module.clean();
                    }
                    p.statements[t].state = StatementState::Starting;
                    // Successors were torn down to Forgotten by the unwind
                    // that preceded this Down (§4.4): reset them to Pending
                    // so the resumed Advance re-instantiates them instead of
                    // silently skipping past a statement `advance` only
                    // handles starting from Pending.
                    for statement in &mut p.statements[t + 1..] {
                        statement.state = StatementState::Pending;
                        statement.module = None;
                        statement.args.clear();
                    }
                    p.direction = Direction::Advancing;
                    p.unwind_reason = None;
                    p.cursor = t;
                }
            }
            Some(UnwindReason::Terminate) | None => EngineInner::finish_process(engine, id),
        }
    }

    fn finish_process(engine: &Rc<EngineInner>, id: ProcessInstanceId) {
        let finished = {
            let mut processes = engine.processes.borrow_mut();
            processes.remove(&id).map(|cell| cell.into_inner())
        };
        let Some(process) = finished else { return };
        tracing::info!(process = %process.name, process_id = %id, aborted = process.aborted.is_some(), "process instance terminated");
        let outcome = match process.aborted {
            Some(message) => ProcessOutcome::Aborted(message),
            None => ProcessOutcome::Completed,
        };
        if let Some(hooks) = engine.completion_hooks.borrow_mut().remove(&id) {
            for hook in hooks {
                hook(outcome.clone());
            }
        }
        if process.caller.is_some() {
            engine.finish_sub_process(id, outcome);
        }
    }

    fn handle_backend_up(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize) {
        let advanced = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let mut p = cell.borrow_mut();
                    if p.cursor != index || p.statements[index].state != StatementState::Starting {
                        false // stale or duplicate callback
                    } else {
                        p.statements[index].state = StatementState::Up;
                        p.cursor += 1;
                        true
                    }
                }
                None => false,
            }
        };
        if advanced {
            EngineInner::schedule_step(engine, id);
        }
    }

    fn handle_backend_down(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize) {
        let is_up = engine.with_process(id, |p| p.statements.get(index).map(|s| s.state) == Some(StatementState::Up)).unwrap_or(false);
        if is_up {
            EngineInner::trigger_rollback(engine, id, UnwindReason::Down(index));
        }
    }

    fn handle_backend_dead(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize) {
        {
            let processes = engine.processes.borrow();
            if let Some(cell) = processes.get(&id) {
                let mut p = cell.borrow_mut();
                p.statements[index].state = StatementState::Forgotten;
                p.statements[index].module = None;
                p.statements[index].args.clear();
            }
        }
        EngineInner::schedule_step(engine, id);
    }

    fn handle_backend_error(engine: &Rc<EngineInner>, id: ProcessInstanceId, index: usize, message: String) {
        let should_abort = {
            let processes = engine.processes.borrow();
            match processes.get(&id) {
                Some(cell) => {
                    let mut p = cell.borrow_mut();
                    if p.statements[index].state != StatementState::Starting {
                        false
                    } else {
                        tracing::error!(process = %p.name, statement = index, %message, "backend_error during Starting; aborting process");
                        p.statements[index].state = StatementState::Forgotten;
                        p.statements[index].module = None;
                        p.aborted = Some(message);
                        true
                    }
                }
                None => false,
            }
        };
        if should_abort {
            EngineInner::trigger_rollback(engine, id, UnwindReason::Terminate);
        }
    }

    fn make_runtime(engine: &Rc<EngineInner>, process: ProcessInstanceId, index: usize) -> Rc<dyn ModuleRuntime> {
        Rc::new(StatementRuntime { engine: engine.clone(), process, index })
    }

    fn statement_args<'a>(&self, id: ProcessInstanceId, index: usize, arena: &'a ValueArena<'a>) -> Vec<Value<'a>> {
        let processes = self.processes.borrow();
        match processes.get(&id) {
            Some(cell) => cell.borrow().statements[index].args.iter().map(|v| arena.alloc_owned(v)).collect(),
            None => Vec::new(),
        }
    }

    fn set_statement_starting(&self, id: ProcessInstanceId, index: usize, args: Vec<OwnedValue>) {
        let processes = self.processes.borrow();
        if let Some(cell) = processes.get(&id) {
            let mut p = cell.borrow_mut();
            p.statements[index].state = StatementState::Starting;
            p.statements[index].args = args;
        }
    }

    fn store_module(&self, id: ProcessInstanceId, index: usize, module: Box<dyn Module>) {
        let processes = self.processes.borrow();
        if let Some(cell) = processes.get(&id) {
            cell.borrow_mut().statements[index].module = Some(module);
        }
    }

    fn set_statement_state(&self, id: ProcessInstanceId, index: usize, state: StatementState) {
        let processes = self.processes.borrow();
        if let Some(cell) = processes.get(&id) {
            cell.borrow_mut().statements[index].state = state;
        }
    }

    /// §4.5 "quiescent": nothing more to progress right now. Mirrors
    /// template up to the calling statement, if this instance is one.
    fn on_quiescent(&self, id: ProcessInstanceId) {
        if let Some(handle) = self.child_to_handle.borrow().get(&id).copied() {
            if let Some(link) = self.sub_processes.borrow().get(&handle) {
                (link.listener.borrow_mut().on_up)();
            }
        }
    }

    fn finish_sub_process(&self, child: ProcessInstanceId, outcome: ProcessOutcome) {
        let Some(handle) = self.child_to_handle.borrow_mut().remove(&child) else { return };
        let Some(link) = self.sub_processes.borrow_mut().remove(&handle) else { return };
        let mut listener = link.listener.into_inner();
        match outcome {
            ProcessOutcome::Completed => (listener.on_down)(),
            ProcessOutcome::Aborted(message) => (listener.on_failed)(message),
        }
    }

    fn spawn_template(
        engine: &Rc<EngineInner>,
        caller_process: ProcessInstanceId,
        caller_index: usize,
        template: &str,
        args: Vec<OwnedValue>,
        listener: TemplateListener,
    ) -> Result<SubProcessHandle, ModuleError> {
        let caller = CallerRef { process: caller_process, statement: caller_index };
        let child = EngineInner::start_process(engine, template, args, Some(caller)).map_err(|err| ModuleError::Resource { message: err.to_string() })?;
        let handle_id = engine.next_sub_handle.get();
        engine.next_sub_handle.set(handle_id + 1);
        let handle = SubProcessHandle(handle_id);
        engine.sub_processes.borrow_mut().insert(handle, TemplateLink { child, listener: RefCell::new(listener) });
        engine.child_to_handle.borrow_mut().insert(child, handle);
        Ok(handle)
    }

    fn stop_template(engine: &Rc<EngineInner>, handle: SubProcessHandle) {
        let child = engine.sub_processes.borrow().get(&handle).map(|link| link.child);
        if let Some(child) = child {
            EngineInner::request_termination(engine, child);
        }
    }
}

/// The `ModuleRuntime` a module call receives (§4.4): one per statement,
/// routing every mutating callback through the Reactor's pending-job queue
/// rather than acting on the module's own call stack.
struct StatementRuntime {
    engine: Rc<EngineInner>,
    process: ProcessInstanceId,
    index: usize,
}

impl ModuleRuntime for StatementRuntime {
    fn backend_up(&self) {
        let engine = self.engine.clone();
        let (process, index) = (self.process, self.index);
        self.engine.context.reactor.enqueue_job(move || EngineInner::handle_backend_up(&engine, process, index));
    }

    fn backend_down(&self) {
        let engine = self.engine.clone();
        let (process, index) = (self.process, self.index);
        self.engine.context.reactor.enqueue_job(move || EngineInner::handle_backend_down(&engine, process, index));
    }

    fn backend_dead(&self) {
        let engine = self.engine.clone();
        let (process, index) = (self.process, self.index);
        self.engine.context.reactor.enqueue_job(move || EngineInner::handle_backend_dead(&engine, process, index));
    }

    fn backend_error(&self, message: String) {
        let engine = self.engine.clone();
        let (process, index) = (self.process, self.index);
        self.engine.context.reactor.enqueue_job(move || EngineInner::handle_backend_error(&engine, process, index, message));
    }

    fn log(&self, message: &str) {
        tracing::info!(process_id = %self.process, statement = self.index, message, "module log");
    }

    fn reactor(&self) -> &Reactor {
        &self.engine.context.reactor
    }

    fn process_manager(&self) -> &ProcessManager {
        &self.engine.context.process_manager
    }

    fn intern(&self, bytes: &[u8]) -> StringId {
        self.engine.context.intern(bytes)
    }

    fn resolve(&self, id: StringId) -> Vec<u8> {
        self.engine.context.resolve(id)
    }

    fn args<'a>(&self, arena: &'a ValueArena<'a>) -> Vec<Value<'a>> {
        self.engine.statement_args(self.process, self.index, arena)
    }

    fn spawn_template(&self, template: &str, args: Vec<OwnedValue>, listener: TemplateListener) -> Result<SubProcessHandle, ModuleError> {
        EngineInner::spawn_template(&self.engine, self.process, self.index, template, args, listener)
    }

    fn stop_template(&self, handle: SubProcessHandle) {
        EngineInner::stop_template(&self.engine, handle)
    }
}

/// The interpreter engine (§4.5): owns every running process instance for
/// one loaded configuration and drives them all off one [`Context`].
#[derive(Clone)]
pub struct Engine {
    inner: Rc<EngineInner>,
}

impl Engine {
    pub fn new(context: Context, config: LoadedConfig) -> Self {
        Self { inner: Rc::new(EngineInner::new(context, config)) }
    }

    /// §4.5 "Engine::load": parses a configuration's process/template
    /// definitions into a [`LoadedConfig`], independent of any running
    /// engine instance.
    pub fn load(program: &Program) -> Result<LoadedConfig, EngineError> {
        LoadedConfig::build(program)
    }

    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    pub fn config(&self) -> &LoadedConfig {
        &self.inner.config
    }

    /// §4.5 "Engine::start": instantiates `name` (a `process`, not a
    /// `template`) as a top-level process and kicks off its first
    /// Advance step.
    pub fn start(&self, name: &str, args: Vec<OwnedValue>) -> Result<ProcessHandle, EngineError> {
        EngineInner::start_process(&self.inner, name, args, None).map(ProcessHandle)
    }

    /// Requests full termination of a running process (§4.5 "Rollback
    /// trigger" via process termination).
    pub fn terminate(&self, handle: ProcessHandle) {
        EngineInner::request_termination(&self.inner, handle.0);
    }

    /// Registers a one-shot callback for when `handle`'s process instance
    /// fully terminates (§4.5 "termination reported to whoever requested
    /// the process").
    pub fn on_complete(&self, handle: ProcessHandle, callback: impl FnOnce(ProcessOutcome) + 'static) {
        self.inner.completion_hooks.borrow_mut().entry(handle.0).or_default().push(Box::new(callback));
    }

    /// Runs the reactor until every process this engine started
    /// terminates and nothing further is scheduled — the CLI's usual
    /// entry point, driven inside a `tokio::task::LocalSet`.
    pub async fn run(&self) {
        self.inner.context.reactor.run().await;
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
