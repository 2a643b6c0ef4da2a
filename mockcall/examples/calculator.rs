// vim: tw=80
//! A hand-written mock object built on mockcall's expectations.
//!
//! Generated mocks do the same thing: keep a list of expectations per method,
//! and route each call to the first one that matches.

use mockcall::*;

pub trait Calculator {
    fn add(&self, x: i64, y: i64) -> i64;
    fn sum(&self, xs: &[i64]) -> i64;
}

#[derive(Default)]
struct MockCalculator {
    expected: Vec<(&'static str, Call)>,
}

impl MockCalculator {
    #[track_caller]
    fn expect_add(&mut self) -> Call {
        let sig = Signature::new()
            .param::<i64>()
            .param::<i64>()
            .returns::<i64>();
        self.expect("add", sig)
    }

    #[track_caller]
    fn expect_sum(&mut self) -> Call {
        let sig = Signature::new().variadic::<i64>().returns::<i64>();
        self.expect("sum", sig)
    }

    #[track_caller]
    fn expect(&mut self, method: &'static str, sig: Signature) -> Call {
        let call = Call::new("MockCalculator", method, sig);
        self.expected.push((method, call.clone()));
        call
    }

    fn call(&self, method: &str, args: Vec<Value>) -> Vec<Value> {
        let mut why = Vec::new();
        for (_, call) in self.expected.iter().filter(|(m, _)| *m == method) {
            match call.matches(&args) {
                Ok(()) => return call.run_actions(args),
                Err(e) => why.push(format!("{}: {}", call, e))
            }
        }
        panic!("No matching expectation found for MockCalculator.{}:\n{}",
               method, why.join("\n"));
    }

    /// Panic if any expectation wasn't called often enough
    fn checkpoint(&self) {
        for (_, call) in self.expected.iter() {
            assert!(call.is_satisfied(), "Missing call: {}", call);
        }
    }
}

impl Calculator for MockCalculator {
    fn add(&self, x: i64, y: i64) -> i64 {
        let r = self.call("add", vec![Box::new(x), Box::new(y)]);
        *r[0].downcast_ref::<i64>().expect("add returns an i64")
    }

    fn sum(&self, xs: &[i64]) -> i64 {
        let args = xs.iter().map(|x| Box::new(*x) as Value).collect();
        let r = self.call("sum", args);
        *r[0].downcast_ref::<i64>().expect("sum returns an i64")
    }
}

/// Code under test
fn average<C: Calculator>(calc: &C, xs: &[i64]) -> i64 {
    let total = calc.sum(xs);
    calc.add(total, 0) / xs.len() as i64
}

fn main() {
    let mut mock = MockCalculator::default();
    let sum = mock.expect_sum();
    sum.add_returning_action(|xs: Variadic<i64>| xs.iter().sum::<i64>());
    let add = mock.expect_add();
    add.after(&sum)
        .with::<i64, _>(predicate::gt(0))
        .with::<i64, _>(predicate::eq(0))
        .add_returning_action(|x: i64, y: i64| x + y);

    let avg = average(&mock, &[2, 4, 6]);
    mock.checkpoint();
    println!("average: {}", avg);
}
