// vim: tw=80
//! Argument matchers and call counts

use mockcall::*;

fn two_args() -> Call {
    Call::new("MockFoo", "foo", Signature::new().param::<u32>().param::<String>())
}

fn args(x: u32, s: &str) -> Vec<Value> {
    vec![Box::new(x), Box::new(s.to_owned())]
}

mod matchers {
    use super::*;

    #[test]
    fn no_matchers_matches_anything() {
        let c = two_args();
        assert!(c.matches(&args(1, "one")).is_ok());
        assert!(c.matches(&[]).is_ok());
    }

    #[test]
    fn with() {
        let c = two_args();
        c.with::<u32, _>(predicate::eq(1))
            .with::<String, _>(predicate::ne(String::from("other")));
        assert!(c.matches(&args(1, "one")).is_ok());
        assert!(c.matches(&args(1, "two")).is_ok());
        let e = c.matches(&args(2, "one")).unwrap_err();
        assert!(matches!(e, Failure::ArgumentMismatch{index: 0, ..}), "{}", e);
        let e = c.matches(&args(1, "other")).unwrap_err();
        assert!(matches!(e, Failure::ArgumentMismatch{index: 1, ..}), "{}", e);
    }

    #[test]
    fn withf() {
        let c = two_args();
        c.withf(|x: &u32| *x > 5)
            .withf(|s: &String| s.len() == 3);
        assert!(c.matches(&args(6, "six")).is_ok());
        assert!(c.matches(&args(4, "six")).is_err());
        assert!(c.matches(&args(6, "seven")).is_err());
    }

    #[test]
    fn wrong_count() {
        let c = two_args();
        c.with::<u32, _>(predicate::always());
        let e = c.matches(&args(1, "one")).unwrap_err();
        assert_eq!(Failure::MatcherCount{got: 2, want: 1}, e);
    }

    #[test]
    fn wrong_type() {
        let c = two_args();
        c.with::<u32, _>(predicate::always())
            .with::<u32, _>(predicate::always());
        let e = c.matches(&args(1, "one")).unwrap_err();
        let msg = e.to_string();
        assert!(msg.contains("expected a value of type u32, got String"),
                "{}", msg);
    }

    #[test]
    fn explanation() {
        let c = Call::new("MockFoo", "foo", Signature::new().param::<u32>());
        c.with::<u32, _>(predicate::gt(5u32));
        let e = c.matches(&[Box::new(4u32) as Value]).unwrap_err();
        let msg = e.to_string();
        assert!(msg.starts_with("argument 0 didn't match"), "{}", msg);
        assert!(msg.contains("var > 5"), "{}", msg);
    }

    #[test]
    fn display_shows_matchers() {
        let c = two_args();
        assert!(c.to_string().starts_with("MockFoo.foo(u32, String) at "),
                "{}", c);
        c.with::<u32, _>(predicate::eq(1))
            .with::<String, _>(predicate::always());
        assert!(c.to_string().starts_with("MockFoo.foo(var == 1, true) at "),
                "{}", c);
    }

    #[test]
    fn origin() {
        let line = line!() + 1;
        let c = two_args_here();
        assert_eq!(file!(), c.origin().file());
        assert_eq!(line, c.origin().line());
    }

    #[track_caller]
    fn two_args_here() -> Call {
        two_args_tracked()
    }

    #[track_caller]
    fn two_args_tracked() -> Call {
        Call::new("MockFoo", "foo", Signature::new())
    }
}

mod times {
    use super::*;

    #[test]
    fn default_is_once() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        assert!(!c.is_satisfied());
        assert!(c.matches(&[]).is_ok());
        c.run_actions(Vec::new());
        assert!(c.is_satisfied());
        assert!(c.is_exhausted());
        let e = c.matches(&[]).unwrap_err();
        assert_eq!(Failure::Exhausted{max: 1}, e);
    }

    #[test]
    fn times() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.times(2);
        c.run_actions(Vec::new());
        assert!(!c.is_satisfied());
        assert!(!c.is_exhausted());
        c.run_actions(Vec::new());
        assert!(c.is_satisfied());
        assert!(c.is_exhausted());
        assert_eq!(2, c.call_count());
    }

    #[test]
    fn never() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.never();
        assert!(c.is_satisfied());
        assert!(c.matches(&[]).is_err());
    }

    #[test]
    fn any() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.times_any();
        assert!(c.is_satisfied());
        for _ in 0..10 {
            c.run_actions(Vec::new());
        }
        assert!(c.matches(&[]).is_ok());
    }

    #[test]
    fn min_times_is_unbounded() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.min_times(2);
        c.run_actions(Vec::new());
        assert!(!c.is_satisfied());
        c.run_actions(Vec::new());
        c.run_actions(Vec::new());
        assert!(c.is_satisfied());
        assert!(!c.is_exhausted());
    }

    #[test]
    fn max_times_is_optional() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.max_times(2);
        assert!(c.is_satisfied());
        c.run_actions(Vec::new());
        assert!(!c.is_exhausted());
        c.run_actions(Vec::new());
        assert!(c.is_exhausted());
    }

    #[test]
    fn min_and_max() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.min_times(2).max_times(3);
        c.run_actions(Vec::new());
        assert!(!c.is_satisfied());
        c.run_actions(Vec::new());
        assert!(c.is_satisfied());
        assert!(!c.is_exhausted());
        c.run_actions(Vec::new());
        assert!(c.is_exhausted());
    }

    #[test]
    fn once() {
        let c = Call::new("MockFoo", "foo", Signature::new());
        c.times(5).once();
        c.run_actions(Vec::new());
        assert!(c.is_exhausted());
    }
}
