// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! AR availability check and install request.
//!
//! [`ArInstallFlow::run`] asks the AR subsystem whether it is available and,
//! if the device is supported, requests installation. The install request is
//! made for every supported answer, including `Installed`, because only the
//! request itself confirms the service is current. The user prompt is
//! offered on the first request of the session only: a request that was
//! answered with `InstallRequested` means the prompt is already on screen or
//! was dismissed, and the host will be resumed when it is done.

use std::fmt;

use krakatoa_core::backend::{ArAvailability, ArSubsystem, InstallStatus};
use krakatoa_core::error::NativeError;
use krakatoa_core::state::ArReadiness;

use crate::config::ArInstallPolicy;

/// Result of one run of the flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArCheck {
    /// What the availability query said.
    pub availability: ArAvailability,
    /// The prompt flag passed to `request_install`, if it was called.
    pub install_prompt: Option<bool>,
    /// Resulting readiness.
    pub readiness: ArReadiness,
}

/// Drives an [`ArSubsystem`] through availability and install.
pub struct ArInstallFlow<A> {
    subsystem: A,
    policy: ArInstallPolicy,
    install_requested: bool,
    install_error: Option<NativeError>,
}

impl<A> fmt::Debug for ArInstallFlow<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArInstallFlow")
            .field("policy", &self.policy)
            .field("install_requested", &self.install_requested)
            .field("install_error", &self.install_error)
            .finish_non_exhaustive()
    }
}

impl<A: ArSubsystem> ArInstallFlow<A> {
    /// Creates a flow that has not requested an install yet.
    #[must_use]
    pub fn new(subsystem: A, policy: ArInstallPolicy) -> Self {
        Self {
            subsystem,
            policy,
            install_requested: false,
            install_error: None,
        }
    }

    /// Runs the availability check and, when supported, the install request.
    pub fn run(&mut self) -> ArCheck {
        let availability = self.subsystem.check_availability();
        let (install_prompt, readiness) = match availability {
            ArAvailability::Checking => {
                log::debug!("AR availability still being determined; will recheck on resume");
                (None, ArReadiness::Checking)
            }
            ArAvailability::Unsupported => {
                log::warn!("AR is not supported on this device");
                (None, ArReadiness::Unsupported)
            }
            ArAvailability::NeedsInstall | ArAvailability::Installed => {
                let prompt = self.policy.prompt_on_first_request && !self.install_requested;
                (Some(prompt), self.request_install(prompt))
            }
        };
        ArCheck {
            availability,
            install_prompt,
            readiness,
        }
    }

    fn request_install(&mut self, prompt: bool) -> ArReadiness {
        match self.subsystem.request_install(prompt) {
            Ok(InstallStatus::Installed) => {
                log::info!("AR subsystem installed");
                ArReadiness::Installed
            }
            Ok(InstallStatus::InstallRequested) => {
                log::info!("AR install requested (prompt: {prompt})");
                self.install_requested = true;
                ArReadiness::InstallRequested
            }
            Err(error) => {
                log::error!("AR install request failed: {error}");
                self.install_error = Some(error);
                ArReadiness::InstallFailed
            }
        }
    }

    /// Whether an install was requested earlier in this session.
    #[must_use]
    pub fn install_requested(&self) -> bool {
        self.install_requested
    }

    /// The error from the failed install request, if any.
    #[must_use]
    pub fn install_error(&self) -> Option<NativeError> {
        self.install_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, CallLog, FakeAr};

    fn flow(ar: FakeAr) -> ArInstallFlow<FakeAr> {
        ArInstallFlow::new(ar, ArInstallPolicy::android())
    }

    #[test]
    fn prompt_only_on_first_request() {
        let log = CallLog::default();
        let ar = FakeAr::new(
            log.clone(),
            ArAvailability::NeedsInstall,
            Ok(InstallStatus::InstallRequested),
        );
        let script = ar.script();
        let mut flow = flow(ar);

        let first = flow.run();
        assert_eq!(first.install_prompt, Some(true));
        assert_eq!(first.readiness, ArReadiness::InstallRequested);
        assert!(flow.install_requested());

        let second = flow.run();
        assert_eq!(second.install_prompt, Some(false));

        script.lock().install = Ok(InstallStatus::Installed);
        let third = flow.run();
        assert_eq!(third.readiness, ArReadiness::Installed);
        assert_eq!(log.count(&Call::RequestInstall { prompt: true }), 1);
        assert_eq!(log.count(&Call::RequestInstall { prompt: false }), 2);
    }

    #[test]
    fn policy_can_disable_prompt() {
        let ar = FakeAr::new(
            CallLog::default(),
            ArAvailability::NeedsInstall,
            Ok(InstallStatus::InstallRequested),
        );
        let mut flow = ArInstallFlow::new(
            ar,
            ArInstallPolicy {
                prompt_on_first_request: false,
            },
        );
        assert_eq!(flow.run().install_prompt, Some(false));
    }

    #[test]
    fn checking_and_unsupported_skip_install() {
        let log = CallLog::default();
        let ar = FakeAr::new(
            log.clone(),
            ArAvailability::Checking,
            Ok(InstallStatus::Installed),
        );
        let script = ar.script();
        let mut flow = flow(ar);

        assert_eq!(flow.run().readiness, ArReadiness::Checking);
        script.lock().availability = ArAvailability::Unsupported;
        let check = flow.run();
        assert_eq!(check.readiness, ArReadiness::Unsupported);
        assert_eq!(check.install_prompt, None);
        assert_eq!(log.calls(), [Call::CheckAvailability, Call::CheckAvailability]);
    }

    #[test]
    fn installed_availability_still_requests_install() {
        let log = CallLog::default();
        let mut flow = flow(FakeAr::installed(log.clone()));
        let check = flow.run();
        assert_eq!(check.availability, ArAvailability::Installed);
        assert_eq!(check.readiness, ArReadiness::Installed);
        assert_eq!(
            log.calls(),
            [Call::CheckAvailability, Call::RequestInstall { prompt: true }]
        );
    }

    #[test]
    fn install_error_is_terminal_failure() {
        let ar = FakeAr::new(
            CallLog::default(),
            ArAvailability::NeedsInstall,
            Err(NativeError::new(-100)),
        );
        let mut flow = flow(ar);
        assert_eq!(flow.run().readiness, ArReadiness::InstallFailed);
        assert_eq!(flow.install_error(), Some(NativeError::new(-100)));
    }
}
