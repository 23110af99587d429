//! Native folder dialog.

use std::panic;
use std::path::Path;

use autozip_engine::{FolderPicker, PickOutcome};
use autozip_logging::{autozip_info, autozip_warn};
use rfd::FileDialog;

/// Opens the system folder dialog through `rfd`.
#[derive(Debug, Default)]
pub struct RfdFolderPicker;

impl FolderPicker for RfdFolderPicker {
    fn pick(&self) -> PickOutcome {
        let picked = panic::catch_unwind(|| {
            FileDialog::new()
                .set_title("Choose the output folder")
                .pick_folder()
        });
        match picked {
            Ok(Some(path)) => {
                autozip_info!("Folder picked: {:?}", path);
                PickOutcome::Picked {
                    name: display_name(&path),
                    full_path: Some(path.display().to_string()),
                }
            }
            Ok(None) => PickOutcome::Aborted,
            Err(_) => {
                autozip_warn!("Folder dialog crashed; falling back to manual entry");
                PickOutcome::Failed("folder dialog unavailable".to_string())
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Whether a native dialog can be shown at all.
pub fn picker_available(enabled: bool) -> bool {
    if !enabled {
        return false;
    }
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    ["DISPLAY", "WAYLAND_DISPLAY"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| !value.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_picker_is_never_available() {
        assert!(!picker_available(false));
    }

    #[test]
    fn drive_root_keeps_its_full_text() {
        assert_eq!(display_name(Path::new("/")), "/");
        assert_eq!(display_name(Path::new("/srv/exports")), "exports");
    }
}
