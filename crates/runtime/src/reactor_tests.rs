use super::*;
use std::cell::RefCell as StdRefCell;
use std::time::Duration;

#[test]
fn jobs_run_in_fifo_order() {
    let reactor = Reactor::new();
    let log = Rc::new(StdRefCell::new(Vec::new()));
    for i in 0..3 {
        let log = log.clone();
        reactor.enqueue_job(move || log.borrow_mut().push(i));
    }
    reactor.run_once();
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
}

#[test]
fn job_enqueued_from_within_a_job_runs_after_the_current_one() {
    let reactor = Reactor::new();
    let log = Rc::new(StdRefCell::new(Vec::new()));
    let inner_reactor = reactor.clone();
    let inner_log = log.clone();
    reactor.enqueue_job(move || {
        inner_log.borrow_mut().push("first");
        let log = inner_log.clone();
        inner_reactor.enqueue_job(move || log.borrow_mut().push("nested"));
    });
    {
        let log = log.clone();
        reactor.enqueue_job(move || log.borrow_mut().push("second"));
    }
    reactor.run_once();
    assert_eq!(*log.borrow(), vec!["first", "second", "nested"]);
}

#[test]
fn cancelling_a_job_prevents_it_from_firing() {
    let reactor = Reactor::new();
    let ran = Rc::new(StdRefCell::new(false));
    let flag = ran.clone();
    let id = reactor.enqueue_job(move || *flag.borrow_mut() = true);
    reactor.cancel_job(id);
    reactor.run_once();
    assert!(!*ran.borrow());
}

#[test]
fn timers_due_at_the_same_instant_fire_in_registration_order() {
    let reactor = Reactor::new();
    let log = Rc::new(StdRefCell::new(Vec::new()));
    for i in 0..3 {
        let log = log.clone();
        reactor.set_timeout(Duration::from_millis(0), move || log.borrow_mut().push(i));
    }
    reactor.run_once();
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
}

#[test]
fn timer_not_yet_due_does_not_fire() {
    let reactor = Reactor::new();
    let ran = Rc::new(StdRefCell::new(false));
    let flag = ran.clone();
    reactor.set_timeout(Duration::from_secs(3600), move || *flag.borrow_mut() = true);
    reactor.run_once();
    assert!(!*ran.borrow());
}

#[test]
fn cancelling_a_due_timer_stops_it_from_firing() {
    let reactor = Reactor::new();
    let ran = Rc::new(StdRefCell::new(false));
    let flag = ran.clone();
    let id = reactor.set_timeout(Duration::from_millis(0), move || *flag.borrow_mut() = true);
    reactor.cancel_timer(id);
    reactor.run_once();
    assert!(!*ran.borrow());
}

#[tokio::test(flavor = "current_thread")]
async fn run_stops_after_quit() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let reactor = Reactor::new();
            let count = Rc::new(StdRefCell::new(0));
            let c = count.clone();
            let r = reactor.clone();
            reactor.enqueue_job(move || {
                *c.borrow_mut() += 1;
                r.quit();
            });
            reactor.run().await;
            assert_eq!(*count.borrow(), 1);
        })
        .await;
}

#[tokio::test(flavor = "current_thread")]
async fn registered_fd_fires_callback_on_readiness() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let (read_end, mut write_end) = {
                use tokio::net::UnixStream;
                UnixStream::pair().expect("pair")
            };
            let reactor = Reactor::new();
            let fired = Rc::new(StdRefCell::new(false));
            let flag = fired.clone();
            let r = reactor.clone();
            let raw_fd = {
                use std::os::unix::io::AsRawFd;
                read_end.as_raw_fd()
            };
            reactor
                .register_fd(raw_fd, Interest::Readable, move || {
                    *flag.borrow_mut() = true;
                    r.quit();
                })
                .expect("register fd");

            use tokio::io::AsyncWriteExt;
            write_end.write_all(b"x").await.expect("write");

            reactor.run().await;
            assert!(*fired.borrow());
            let _ = read_end.try_read(&mut [0u8; 1]);
        })
        .await;
}
