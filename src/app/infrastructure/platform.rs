#[cfg(any(target_os = "linux", target_os = "macos"))]
use std::process::Command;

#[cfg(target_os = "windows")]
const PERSONALIZE_KEY: &str = "Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize";

/// `AppsUseLightTheme` is 0 when apps use the dark theme.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn is_dark_light_theme_flag(apps_use_light_theme: u32) -> bool {
    apps_use_light_theme == 0
}

/// Best-effort detection of the desktop's dark appearance.
pub fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "windows")]
    {
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        match RegKey::predef(HKEY_CURRENT_USER).open_subkey(PERSONALIZE_KEY) {
            Ok(key) => match key.get_value::<u32, _>("AppsUseLightTheme") {
                Ok(value) => return is_dark_light_theme_flag(value),
                Err(e) => log::debug!("AppsUseLightTheme unreadable: {}", e),
            },
            Err(e) => log::debug!("Personalize key unreadable: {}", e),
        }
    }

    // Linux: Try to detect system theme on GNOME
    #[cfg(target_os = "linux")]
    {
        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "color-scheme"])
            .output()
        {
            let scheme = String::from_utf8_lossy(&output.stdout);
            if scheme.contains("prefer-dark") {
                return true;
            }
        }

        if let Ok(output) = Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", "gtk-theme"])
            .output()
        {
            let theme = String::from_utf8_lossy(&output.stdout).to_lowercase();
            if theme.contains("dark") {
                return true;
            }
        }
    }

    // macOS: Check AppleInterfaceStyle
    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = Command::new("defaults")
            .args(["read", "-g", "AppleInterfaceStyle"])
            .output()
            && output.status.success()
        {
            let style = String::from_utf8_lossy(&output.stdout).to_lowercase();
            if style.contains("dark") {
                return true;
            }
        }
    }

    log::debug!("No dark appearance detected, assuming light");
    false
}
