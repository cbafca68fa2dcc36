//! Settings persisted by the Cloud3DP firmware.
//!
//! The device keeps every setting as a string under a flat, dotted key and
//! spells booleans as `"0"` / `"1"`. This table mirrors the firmware's entry
//! list together with its compiled-in defaults.

use bitflags::bitflags;

bitflags! {
    /// Traits of a device setting.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// Stored as the fake-boolean `"0"` / `"1"`.
        const BOOLEAN = 1 << 0;
        /// Credential; never echoed into logs.
        const SECRET = 1 << 1;
    }
}

/// One persisted device setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceEntry {
    pub key: &'static str,
    pub default: &'static str,
    pub flags: EntryFlags,
    pub description: &'static str,
}

impl DeviceEntry {
    const fn new(
        key: &'static str,
        default: &'static str,
        flags: EntryFlags,
        description: &'static str,
    ) -> Self {
        Self { key, default, flags, description }
    }

    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        self.flags.contains(EntryFlags::BOOLEAN)
    }

    #[must_use]
    pub const fn is_secret(&self) -> bool {
        self.flags.contains(EntryFlags::SECRET)
    }
}

const PLAIN: EntryFlags = EntryFlags::empty();
const BOOLEAN: EntryFlags = EntryFlags::BOOLEAN;
const SECRET: EntryFlags = EntryFlags::SECRET;

/// Every setting the firmware persists, in firmware order.
pub const DEVICE_ENTRIES: &[DeviceEntry] = &[
    DeviceEntry::new("web.ws.name", "", PLAIN, "Username for the websocket connection"),
    DeviceEntry::new("web.ws.pass", "", SECRET, "Websocket password; empty disables auth"),
    DeviceEntry::new("web.http.name", "", PLAIN, "Username for the web pages"),
    DeviceEntry::new("web.http.pass", "", SECRET, "Web page password; empty disables auth"),
    DeviceEntry::new("web.view.editor", "/ap/editor.html", PLAIN, "Online editor template"),
    DeviceEntry::new("web.view.manage", "/ap/fileman.html", PLAIN, "File manager template"),
    DeviceEntry::new("web.view.update", "/ap/update.html", PLAIN, "OTA update template"),
    DeviceEntry::new("web.path.assets", "/src/", PLAIN, "Public CSS/JS files"),
    DeviceEntry::new("web.path.sta", "/sta/", PLAIN, "Static files served on the STA interface"),
    DeviceEntry::new("web.path.ap", "/ap/", PLAIN, "Static files served on the AP interface"),
    DeviceEntry::new("web.path.static", "/root/", PLAIN, "Sitemap, favicon and similar files"),
    DeviceEntry::new("web.path.data", "/data/", PLAIN, "Data directory (gcode etc.)"),
    DeviceEntry::new("net.ap.ssid", "Cloud3DP", PLAIN, "Hotspot SSID"),
    DeviceEntry::new("net.ap.pass", "12345678", SECRET, "Hotspot password"),
    DeviceEntry::new("net.ap.host", "10.0.0.1", PLAIN, "Hotspot IP address"),
    DeviceEntry::new("net.ap.hide", "0", BOOLEAN, "Hide the hotspot SSID"),
    DeviceEntry::new("net.sta.ssid", "", PLAIN, "Access point to join after startup"),
    DeviceEntry::new("net.sta.pass", "", SECRET, "Password of the access point to join"),
    DeviceEntry::new("app.dns.run", "0", BOOLEAN, "Enable the mDNS service"),
    DeviceEntry::new("app.dns.host", "", PLAIN, "Hostname redirected to the hotspot address"),
    DeviceEntry::new("app.ota.run", "0", BOOLEAN, "Enable automatic update checks"),
    DeviceEntry::new("app.ota.url", "", PLAIN, "URL to fetch firmware from"),
    DeviceEntry::new("app.cmd.prompt", "c3dp> ", PLAIN, "Console prompt"),
];

/// Looks up a setting by its flat key.
#[must_use]
pub fn find_entry(key: &str) -> Option<&'static DeviceEntry> {
    DEVICE_ENTRIES.iter().find(|entry| entry.key == key)
}

/// Keys of the settings stored as fake-booleans.
pub fn boolean_keys() -> impl Iterator<Item = &'static str> {
    DEVICE_ENTRIES.iter().filter(|entry| entry.is_boolean()).map(|entry| entry.key)
}

/// Returns `true` if the key holds a credential.
#[must_use]
pub fn is_secret(key: &str) -> bool {
    find_entry(key).is_some_and(DeviceEntry::is_secret)
}
