// vim: tw=80
//! Where failures go.

/// The test harness's failure channel.
///
/// `report_fatal` must stop the current test step from proceeding.  The
/// default [`PanicReporter`] does that by panicking, which unwinds only the
/// calling thread.  Implementations must be callable from any thread, since
/// a mocked method may be called from any thread.
pub trait Reporter: Send + Sync {
    /// Report a failure after which the test may continue
    fn report_error(&self, msg: &str);

    /// Report a failure after which the test must not continue
    fn report_fatal(&self, msg: &str);
}

/// Logs errors and panics on fatal failures.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report_error(&self, msg: &str) {
        tracing::error!("{}", msg);
    }

    fn report_fatal(&self, msg: &str) {
        panic!("{}", msg);
    }
}
