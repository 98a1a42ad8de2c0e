//! The remote-then-local decision, kept free of any I/O so it can be tested
//! on its own. Each controller operation walks one `Plan` to `Done`.

/// Where an operation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    TryRemote,
    Fallback,
    Done,
}

/// Why a remote attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// No response at all.
    Connectivity,
    /// The API responded, but with an error.
    Rejected,
}

/// Which remote failures may be papered over by the local cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Load and submit: anything goes wrong, use the cache.
    AnyFailure,
    /// Delete: only an unreachable API falls back. A rejection means the
    /// server holds state the cache must not contradict.
    ConnectivityOnly,
}

impl Policy {
    pub fn allows(self, failure: Failure) -> bool {
        match self {
            Policy::AnyFailure => true,
            Policy::ConnectivityOnly => failure == Failure::Connectivity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    step: Step,
    policy: Policy,
}

impl Plan {
    pub fn new(remote_configured: bool, policy: Policy) -> Self {
        let step = if remote_configured {
            Step::TryRemote
        } else {
            Step::Fallback
        };
        Self { step, policy }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn remote_succeeded(&mut self) {
        debug_assert_eq!(self.step, Step::TryRemote);
        self.step = Step::Done;
    }

    /// Record a remote failure. Returns `true` when the plan moved on to the
    /// cache, `false` when the operation ends here with the error.
    pub fn remote_failed(&mut self, failure: Failure) -> bool {
        debug_assert_eq!(self.step, Step::TryRemote);
        if self.policy.allows(failure) {
            self.step = Step::Fallback;
            true
        } else {
            self.step = Step::Done;
            false
        }
    }

    pub fn fallback_finished(&mut self) {
        debug_assert_eq!(self.step, Step::Fallback);
        self.step = Step::Done;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_remote_starts_at_fallback() {
        let mut plan = Plan::new(false, Policy::AnyFailure);
        assert_eq!(plan.step(), Step::Fallback);
        plan.fallback_finished();
        assert_eq!(plan.step(), Step::Done);
    }

    #[test]
    fn remote_success_skips_cache() {
        let mut plan = Plan::new(true, Policy::AnyFailure);
        assert_eq!(plan.step(), Step::TryRemote);
        plan.remote_succeeded();
        assert_eq!(plan.step(), Step::Done);
    }

    #[test]
    fn any_failure_policy_always_falls_back() {
        for failure in [Failure::Connectivity, Failure::Rejected] {
            let mut plan = Plan::new(true, Policy::AnyFailure);
            assert!(plan.remote_failed(failure));
            assert_eq!(plan.step(), Step::Fallback);
        }
    }

    #[test]
    fn connectivity_only_policy_stops_on_rejection() {
        let mut plan = Plan::new(true, Policy::ConnectivityOnly);
        assert!(!plan.remote_failed(Failure::Rejected));
        assert_eq!(plan.step(), Step::Done);

        let mut plan = Plan::new(true, Policy::ConnectivityOnly);
        assert!(plan.remote_failed(Failure::Connectivity));
        assert_eq!(plan.step(), Step::Fallback);
    }
}
