// Copyright 2026 the Krakatoa Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinator configuration and platform presets.

/// Configuration for the [`RenderLoop`](crate::render_loop::RenderLoop)
/// worker thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderLoopConfig {
    /// Name given to the worker thread.
    pub thread_name: &'static str,
    /// Worker stack size in bytes. `None` uses the platform default.
    pub stack_size: Option<usize>,
    /// Number of consecutive [`FrameError::Transient`] results after which
    /// the loop gives up and records a fault. `None` retries forever.
    ///
    /// [`FrameError::Transient`]: krakatoa_core::error::FrameError::Transient
    pub max_consecutive_transient_errors: Option<u32>,
}

impl RenderLoopConfig {
    /// Android preset: skip frames whose AR update failed for as long as it
    /// keeps failing.
    #[must_use]
    pub const fn android() -> Self {
        Self {
            thread_name: "krakatoa-render",
            stack_size: None,
            max_consecutive_transient_errors: None,
        }
    }
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self::android()
    }
}

/// How the AR install flow prompts the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArInstallPolicy {
    /// Allow the AR service to show its install/update prompt on the first
    /// install request of the session. Later requests never prompt.
    pub prompt_on_first_request: bool,
}

impl ArInstallPolicy {
    /// Android preset: prompt once.
    #[must_use]
    pub const fn android() -> Self {
        Self {
            prompt_on_first_request: true,
        }
    }
}

impl Default for ArInstallPolicy {
    fn default() -> Self {
        Self::android()
    }
}

/// Top-level configuration for the [`Coordinator`](crate::coordinator::Coordinator).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Render worker settings.
    pub render_loop: RenderLoopConfig,
    /// AR install prompting.
    pub ar_install: ArInstallPolicy,
}

impl CoordinatorConfig {
    /// Android preset.
    #[must_use]
    pub const fn android() -> Self {
        Self {
            render_loop: RenderLoopConfig::android(),
            ar_install: ArInstallPolicy::android(),
        }
    }
}
