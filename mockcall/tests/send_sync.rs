// vim: tw=80
//! Expectations may be shared between threads

use mockcall::*;
use static_assertions::assert_impl_all;
use std::{sync::Arc, thread};

assert_impl_all!(Call: Clone, Send, Sync);
assert_impl_all!(Action: Send, Sync);
assert_impl_all!(Signature: Clone, Send, Sync);
assert_impl_all!(Failure: Send, Sync, std::error::Error);
assert_impl_all!(Value: Clone, Send);
assert_impl_all!(PanicReporter: Reporter);

#[test]
fn call_from_another_thread() {
    let sig = Signature::new().param::<u32>().returns::<u32>();
    let c = Call::new("MockFoo", "foo", sig);
    c.times(4);
    c.add_returning_action(|x: u32| x * 2);
    let handles = (0..4u32).map(|i| {
        let c = c.clone();
        thread::spawn(move || {
            let r = c.run_actions(vec![Box::new(i)]);
            *r[0].downcast_ref::<u32>().unwrap()
        })
    }).collect::<Vec<_>>();
    let mut results = handles.into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Vec<_>>();
    results.sort_unstable();
    assert_eq!(vec![0, 2, 4, 6], results);
    assert!(c.is_exhausted());
}

#[test]
fn prerequisite_on_another_thread() {
    let c1 = Call::new("MockFoo", "open", Signature::new());
    let c2 = Call::new("MockFoo", "read", Signature::new());
    c2.after(&c1);
    let c1b = c1.clone();
    thread::spawn(move || { c1b.run_actions(Vec::new()); })
        .join()
        .unwrap();
    assert!(c2.is_eligible());
}

#[test]
fn shared_reporter() {
    let reporter: Arc<dyn Reporter> = Arc::new(PanicReporter);
    let c1 = Call::with_reporter("MockFoo", "foo", Signature::new(),
                                 reporter.clone());
    let c2 = Call::with_reporter("MockFoo", "bar", Signature::new(), reporter);
    c1.after(&c2);
    assert_ne!(c1, c2);
}
