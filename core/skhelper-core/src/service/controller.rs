use std::path::PathBuf;
use std::thread;

use super::{
    Architecture, LaunchRequest, PollPolicy, ProcessLauncher, ReadinessProbe, ServiceHandle,
    ServiceState,
};
use crate::error::HelperError;
use crate::notify::{Notification, NotificationSink};
use crate::storage::Layout;

/// Starts and stops the helper service for one architecture at a time.
pub struct ServiceController<'a> {
    base: PathBuf,
    system_root: PathBuf,
    launcher: &'a dyn ProcessLauncher,
    probe: &'a dyn ReadinessProbe,
    notifications: &'a dyn NotificationSink,
    policy: PollPolicy,
}

impl<'a> ServiceController<'a> {
    pub fn new(
        layout: &Layout,
        launcher: &'a dyn ProcessLauncher,
        probe: &'a dyn ReadinessProbe,
        notifications: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            base: layout.sk_root().to_path_buf(),
            system_root: layout.system_root().to_path_buf(),
            launcher,
            probe,
            notifications,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn handle(&self, architecture: Architecture) -> ServiceHandle {
        ServiceHandle::new(architecture, &self.base, &self.system_root)
    }

    pub fn start(&self, architecture: Architecture) -> bool {
        self.start_service(architecture) == ServiceState::Ready
    }

    /// Installs the service and waits for its readiness event. Ends in
    /// [`ServiceState::Ready`] or [`ServiceState::StartFailed`].
    pub fn start_service(&self, architecture: Architecture) -> ServiceState {
        let handle = self.handle(architecture);

        if !handle.helper_library.is_file() {
            let message = format!(
                "Special K dll not found in {}",
                handle.helper_library.display()
            );
            tracing::info!(%architecture, "{}", message);
            self.notifications.notify(Notification::error(
                format!("sk_dll_notfound{}", architecture.suffix()),
                message,
            ));
            return ServiceState::StartFailed;
        }

        tracing::debug!(%architecture, state = ?ServiceState::Starting, "Service transition");
        if let Err(err) = self.launch(&handle, handle.install_arguments()) {
            tracing::error!(%architecture, error = %err, "Service install launch failed");
            return ServiceState::StartFailed;
        }

        for attempt in 1..=self.policy.attempts {
            thread::sleep(self.policy.interval);
            if self.probe.is_signaled(&handle.readiness_signal) {
                tracing::info!(
                    %architecture,
                    attempt,
                    library = %handle.helper_library.display(),
                    "Special K global service started"
                );
                return ServiceState::Ready;
            }
        }

        let err = HelperError::TimeoutNotReady {
            signal: handle.readiness_signal.clone(),
            attempts: self.policy.attempts,
        };
        tracing::warn!(%architecture, error = %err, "Special K global service did not report ready");
        ServiceState::StartFailed
    }

    /// Launches the removal command without waiting for it. False when the
    /// library is missing or the command could not be spawned.
    pub fn stop(&self, architecture: Architecture) -> bool {
        let handle = self.handle(architecture);

        if !handle.helper_library.is_file() {
            tracing::info!(
                %architecture,
                library = %handle.helper_library.display(),
                "Special K dll not found, nothing to stop"
            );
            return false;
        }

        tracing::debug!(%architecture, state = ?ServiceState::Stopping, "Service transition");
        match self.launch(&handle, handle.remove_arguments()) {
            Ok(()) => {
                tracing::info!(%architecture, "Special K service has been removed");
                true
            }
            Err(err) => {
                tracing::error!(%architecture, error = %err, "Special K service could not be removed");
                false
            }
        }
    }

    fn launch(&self, handle: &ServiceHandle, arguments: String) -> Result<(), HelperError> {
        let request = LaunchRequest {
            program: handle.launcher.clone(),
            arguments,
            working_dir: self.base.clone(),
        };
        self.launcher
            .launch(&request)
            .map_err(|source| HelperError::ExternalProcessFailure {
                program: request.program.display().to_string(),
                source,
            })
    }
}
