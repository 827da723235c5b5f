//! Role vocabulary tables: raw tree role → standard ARIA role, and the
//! interactive/transparent/drop sets used to build and reduce outlines.
//!
//! Kept as plain data (a `RoleTable` the caller can swap) rather than baked
//! into the traversal logic, per the design note that new ARIA roles should
//! be addable without touching the Outline Builder itself.

use std::collections::{HashMap, HashSet};

/// Roles dropped entirely, without descending into their children (§4.1).
pub const DROP_ROLES: &[&str] = &["InlineTextBox", "LineBreak"];

/// Raw roles that are transparent: no line is emitted, but children are
/// still visited at the same depth (§4.1). Any role whose mapping is
/// undefined is *also* transparent — see `RoleTable::is_transparent`.
pub const TRANSPARENT_ROLES: &[&str] =
    &["none", "presentation", "StaticText", "RootWebArea", "ignored"];

/// Mapped (ARIA) roles considered interactive: reference-bearing regardless
/// of whether they carry a name (§4.1 Reference assignment).
pub const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "textbox",
    "checkbox",
    "radio",
    "combobox",
    "listbox",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "searchbox",
    "slider",
    "spinbutton",
    "switch",
    "tab",
    "treeitem",
];

/// Roles the Differ's noise filter drops from added/removed (but not
/// unchanged) counts (§4.3).
pub const DIFFER_NOISE_ROLES: &[&str] = &[
    "generic", "group", "list", "table", "row", "document", "text", "strong", "emphasis", "mark",
];

/// Translates the accessibility tree's raw role vocabulary into a standard
/// ARIA-role vocabulary, and classifies roles for the Outline Builder.
#[derive(Debug, Clone)]
pub struct RoleTable {
    mapping: HashMap<String, String>,
    transparent: HashSet<String>,
    drop: HashSet<String>,
    interactive: HashSet<String>,
    /// Every ARIA role this table ever maps *to* — the vocabulary the Differ's
    /// strict line parser accepts (spec §4.3).
    known_aria_roles: HashSet<String>,
}

impl RoleTable {
    /// The fixed table from spec §4.1, plus common Chrome/ARIA role pairs
    /// needed to exercise the reducer pipeline and differ realistically.
    pub fn default_table() -> Self {
        let pairs: &[(&str, &str)] = &[
            ("TextField", "textbox"),
            ("textField", "textbox"),
            ("searchBox", "searchbox"),
            ("search", "searchbox"),
            ("WebArea", "document"),
            ("RootWebArea", "document"),
            ("paragraph", "text"),
            ("Section", "region"),
            ("section", "region"),
            ("image", "img"),
            ("Image", "img"),
            ("complementary", "region"),
            ("form", "group"),
            ("button", "button"),
            ("Button", "button"),
            ("link", "link"),
            ("Link", "link"),
            ("checkbox", "checkbox"),
            ("radio", "radio"),
            ("radioButton", "radio"),
            ("comboBox", "combobox"),
            ("combobox", "combobox"),
            ("popUpButton", "combobox"),
            ("listBox", "listbox"),
            ("listbox", "listbox"),
            ("listBoxOption", "option"),
            ("option", "option"),
            ("menuItem", "menuitem"),
            ("menuitem", "menuitem"),
            ("menuItemCheckBox", "menuitemcheckbox"),
            ("menuItemRadio", "menuitemradio"),
            ("slider", "slider"),
            ("spinButton", "spinbutton"),
            ("spinbutton", "spinbutton"),
            ("switch", "switch"),
            ("tab", "tab"),
            ("tabPanel", "tabpanel"),
            ("tabList", "tablist"),
            ("treeItem", "treeitem"),
            ("treeitem", "treeitem"),
            ("heading", "heading"),
            ("list", "list"),
            ("listItem", "listitem"),
            ("listitem", "listitem"),
            ("table", "table"),
            ("row", "row"),
            ("cell", "cell"),
            ("columnHeader", "columnheader"),
            ("article", "article"),
            ("navigation", "navigation"),
            ("banner", "banner"),
            ("contentInfo", "contentinfo"),
            ("main", "main"),
            ("dialog", "dialog"),
            ("alert", "alert"),
            ("alertDialog", "alertdialog"),
            ("group", "group"),
            ("genericContainer", "generic"),
            ("generic", "generic"),
            ("staticText", "text"),
            ("text", "text"),
            ("strong", "strong"),
            ("emphasis", "emphasis"),
            ("mark", "mark"),
            ("document", "document"),
        ];

        let mapping: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let known_aria_roles = mapping.values().cloned().collect();

        Self {
            mapping,
            transparent: TRANSPARENT_ROLES.iter().map(|s| s.to_string()).collect(),
            drop: DROP_ROLES.iter().map(|s| s.to_string()).collect(),
            interactive: INTERACTIVE_ROLES.iter().map(|s| s.to_string()).collect(),
            known_aria_roles,
        }
    }

    /// Map a raw role to its ARIA role, if the mapping is defined.
    pub fn map(&self, raw_role: &str) -> Option<&str> {
        self.mapping.get(raw_role).map(|s| s.as_str())
    }

    pub fn is_drop(&self, raw_role: &str) -> bool {
        self.drop.contains(raw_role)
    }

    /// A raw role is transparent if it's in the literal transparent set, or
    /// if it has no defined mapping at all (§4.1: "any role whose mapping
    /// is undefined").
    pub fn is_transparent(&self, raw_role: &str) -> bool {
        self.transparent.contains(raw_role) || self.map(raw_role).is_none()
    }

    pub fn is_interactive(&self, mapped_role: &str) -> bool {
        self.interactive.contains(mapped_role)
    }

    /// Whether `role` is a role this table's mapping ever produces — the
    /// vocabulary the Differ's strict parser recognizes. A rendered outline
    /// also carries a couple of roles with no raw-tree source (`"chrome-actions"`
    /// groups reuse the already-known `group` role, so nothing extra is needed).
    pub fn is_known_aria_role(&self, role: &str) -> bool {
        self.known_aria_roles.contains(role)
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::default_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_examples_from_spec() {
        let t = RoleTable::default();
        assert_eq!(t.map("TextField"), Some("textbox"));
        assert_eq!(t.map("WebArea"), Some("document"));
        assert_eq!(t.map("paragraph"), Some("text"));
        assert_eq!(t.map("Section"), Some("region"));
        assert_eq!(t.map("image"), Some("img"));
        assert_eq!(t.map("search"), Some("searchbox"));
        assert_eq!(t.map("complementary"), Some("region"));
        assert_eq!(t.map("form"), Some("group"));
    }

    #[test]
    fn unmapped_role_is_transparent() {
        let t = RoleTable::default();
        assert!(t.is_transparent("SomeFutureWidgetRole"));
    }

    #[test]
    fn drop_roles_are_not_also_transparent_roles() {
        for role in DROP_ROLES {
            assert!(!TRANSPARENT_ROLES.contains(role));
        }
    }
}
