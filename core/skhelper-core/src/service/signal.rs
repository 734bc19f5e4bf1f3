//! Presence checks for the service's named readiness event.

pub trait ReadinessProbe {
    /// True when a synchronization object with this name currently exists.
    /// The probe must not hold on to the object.
    fn is_signaled(&self, name: &str) -> bool;
}

/// Opens the named event with `SYNCHRONIZE` access and closes it right away.
/// Named events only exist on Windows; elsewhere the signal never appears.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedEventProbe;

impl ReadinessProbe for NamedEventProbe {
    fn is_signaled(&self, name: &str) -> bool {
        #[cfg(windows)]
        {
            win32::event_exists(name)
        }
        #[cfg(not(windows))]
        {
            let _ = name;
            false
        }
    }
}

#[cfg(windows)]
mod win32 {
    use windows_sys::Win32::Foundation::CloseHandle;
    use windows_sys::Win32::System::Threading::{OpenEventW, SYNCHRONIZATION_SYNCHRONIZE};

    pub(super) fn event_exists(name: &str) -> bool {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: `wide` is NUL-terminated and outlives the call; a non-null
        // handle is owned here and closed exactly once.
        unsafe {
            let handle = OpenEventW(SYNCHRONIZATION_SYNCHRONIZE, 0, wide.as_ptr());
            if handle.is_null() {
                return false;
            }
            CloseHandle(handle);
        }
        true
    }
}
