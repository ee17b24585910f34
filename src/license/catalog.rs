//! Static registry of SPDX license and exception identifiers.
//!
//! The catalog is built once on first use and never mutated afterwards.
//! Lookups are case-sensitive on the canonical id. Deprecated entries stay
//! resolvable so that older manifests are still recognized; callers read the
//! [`License::deprecated`] flag to decide whether to warn.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// A license entry in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct License {
    /// Canonical SPDX identifier, e.g. `"Apache-2.0"` or `"GPL-2.0+"`.
    pub id: &'static str,
    /// Full license name.
    pub name: &'static str,
    /// Superseded by a newer identifier but kept for backward compatibility.
    pub deprecated: bool,
    /// The base form of this id also exists with an `-or-later` suffix.
    pub or_later_eligible: bool,
}

/// A license exception entry in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Exception {
    pub id: &'static str,
    pub name: &'static str,
    pub deprecated: bool,
}

// (id, name, deprecated)
const LICENSES: &[(&str, &str, bool)] = &[
    // Permissive
    ("0BSD", "BSD Zero Clause License", false),
    ("AFL-3.0", "Academic Free License v3.0", false),
    ("Apache-1.0", "Apache License 1.0", false),
    ("Apache-1.1", "Apache License 1.1", false),
    ("Apache-2.0", "Apache License 2.0", false),
    ("Artistic-1.0", "Artistic License 1.0", false),
    ("Artistic-2.0", "Artistic License 2.0", false),
    ("Beerware", "Beerware License", false),
    ("BlueOak-1.0.0", "Blue Oak Model License 1.0.0", false),
    ("BSD-1-Clause", "BSD 1-Clause License", false),
    ("BSD-2-Clause", "BSD 2-Clause \"Simplified\" License", false),
    ("BSD-2-Clause-Patent", "BSD-2-Clause Plus Patent License", false),
    ("BSD-3-Clause", "BSD 3-Clause \"New\" or \"Revised\" License", false),
    ("BSD-3-Clause-Clear", "BSD 3-Clause Clear License", false),
    ("BSD-4-Clause", "BSD 4-Clause \"Original\" or \"Old\" License", false),
    ("BSL-1.0", "Boost Software License 1.0", false),
    ("CC-BY-3.0", "Creative Commons Attribution 3.0 Unported", false),
    ("CC-BY-4.0", "Creative Commons Attribution 4.0 International", false),
    ("CC0-1.0", "Creative Commons Zero v1.0 Universal", false),
    ("FTL", "Freetype Project License", false),
    ("HPND", "Historical Permission Notice and Disclaimer", false),
    ("ICU", "ICU License", false),
    ("IJG", "Independent JPEG Group License", false),
    ("ISC", "ISC License", false),
    ("Libpng", "libpng License", false),
    ("MIT", "MIT License", false),
    ("MIT-0", "MIT No Attribution", false),
    ("MS-PL", "Microsoft Public License", false),
    ("NCSA", "University of Illinois/NCSA Open Source License", false),
    ("OpenSSL", "OpenSSL License", false),
    ("PHP-3.01", "PHP License v3.01", false),
    ("PostgreSQL", "PostgreSQL License", false),
    ("PSF-2.0", "Python Software Foundation License 2.0", false),
    ("Python-2.0", "Python License 2.0", false),
    ("Ruby", "Ruby License", false),
    ("Unicode-DFS-2016", "Unicode License Agreement - Data Files and Software (2016)", false),
    ("Unlicense", "The Unlicense", false),
    ("UPL-1.0", "Universal Permissive License v1.0", false),
    ("Vim", "Vim License", false),
    ("W3C", "W3C Software Notice and License (2002-12-31)", false),
    ("WTFPL", "Do What The F*ck You Want To Public License", false),
    ("X11", "X11 License", false),
    ("Zlib", "zlib License", false),
    ("ZPL-2.1", "Zope Public License 2.1", false),
    // Weak copyleft
    ("APSL-2.0", "Apple Public Source License 2.0", false),
    ("CC-BY-SA-3.0", "Creative Commons Attribution Share Alike 3.0 Unported", false),
    ("CC-BY-SA-4.0", "Creative Commons Attribution Share Alike 4.0 International", false),
    ("CDDL-1.0", "Common Development and Distribution License 1.0", false),
    ("CDDL-1.1", "Common Development and Distribution License 1.1", false),
    ("CECILL-2.1", "CeCILL Free Software License Agreement v2.1", false),
    ("CPL-1.0", "Common Public License 1.0", false),
    ("EPL-1.0", "Eclipse Public License 1.0", false),
    ("EPL-2.0", "Eclipse Public License 2.0", false),
    ("LGPL-2.0-only", "GNU Library General Public License v2 only", false),
    ("LGPL-2.0-or-later", "GNU Library General Public License v2 or later", false),
    ("LGPL-2.1-only", "GNU Lesser General Public License v2.1 only", false),
    ("LGPL-2.1-or-later", "GNU Lesser General Public License v2.1 or later", false),
    ("LGPL-3.0-only", "GNU Lesser General Public License v3.0 only", false),
    ("LGPL-3.0-or-later", "GNU Lesser General Public License v3.0 or later", false),
    ("MPL-1.1", "Mozilla Public License 1.1", false),
    ("MPL-2.0", "Mozilla Public License 2.0", false),
    (
        "MPL-2.0-no-copyleft-exception",
        "Mozilla Public License 2.0 (no copyleft exception)",
        false,
    ),
    ("MS-RL", "Microsoft Reciprocal License", false),
    ("ODbL-1.0", "Open Data Commons Open Database License v1.0", false),
    ("OFL-1.1", "SIL Open Font License 1.1", false),
    ("OSL-3.0", "Open Software License 3.0", false),
    // Strong copyleft
    ("AGPL-1.0-only", "Affero General Public License v1.0 only", false),
    ("AGPL-1.0-or-later", "Affero General Public License v1.0 or later", false),
    ("AGPL-3.0-only", "GNU Affero General Public License v3.0 only", false),
    ("AGPL-3.0-or-later", "GNU Affero General Public License v3.0 or later", false),
    ("EUPL-1.1", "European Union Public License 1.1", false),
    ("EUPL-1.2", "European Union Public License 1.2", false),
    ("GFDL-1.3-only", "GNU Free Documentation License v1.3 only", false),
    ("GFDL-1.3-or-later", "GNU Free Documentation License v1.3 or later", false),
    ("GPL-1.0-only", "GNU General Public License v1.0 only", false),
    ("GPL-1.0-or-later", "GNU General Public License v1.0 or later", false),
    ("GPL-2.0-only", "GNU General Public License v2.0 only", false),
    ("GPL-2.0-or-later", "GNU General Public License v2.0 or later", false),
    ("GPL-3.0-only", "GNU General Public License v3.0 only", false),
    ("GPL-3.0-or-later", "GNU General Public License v3.0 or later", false),
    // Deprecated
    ("AGPL-1.0", "Affero General Public License v1.0", true),
    ("AGPL-3.0", "GNU Affero General Public License v3.0", true),
    ("eCos-2.0", "eCos license version 2.0", true),
    ("GFDL-1.3", "GNU Free Documentation License v1.3", true),
    ("GPL-1.0", "GNU General Public License v1.0 only", true),
    ("GPL-1.0+", "GNU General Public License v1.0 or later", true),
    ("GPL-2.0", "GNU General Public License v2.0 only", true),
    ("GPL-2.0+", "GNU General Public License v2.0 or later", true),
    (
        "GPL-2.0-with-classpath-exception",
        "GNU General Public License v2.0 w/Classpath exception",
        true,
    ),
    ("GPL-3.0", "GNU General Public License v3.0 only", true),
    ("GPL-3.0+", "GNU General Public License v3.0 or later", true),
    ("LGPL-2.0", "GNU Library General Public License v2 only", true),
    ("LGPL-2.0+", "GNU Library General Public License v2 or later", true),
    ("LGPL-2.1", "GNU Lesser General Public License v2.1 only", true),
    ("LGPL-2.1+", "GNU Lesser General Public License v2.1 or later", true),
    ("LGPL-3.0", "GNU Lesser General Public License v3.0 only", true),
    ("LGPL-3.0+", "GNU Lesser General Public License v3.0 or later", true),
    ("Nunit", "Nunit License", true),
    ("StandardML-NJ", "Standard ML of New Jersey License", true),
    ("wxWindows", "wxWindows Library License", true),
];

const EXCEPTIONS: &[(&str, &str, bool)] = &[
    ("Autoconf-exception-2.0", "Autoconf exception 2.0", false),
    ("Autoconf-exception-3.0", "Autoconf exception 3.0", false),
    ("Bison-exception-2.2", "Bison exception 2.2", false),
    ("Bootloader-exception", "Bootloader Distribution Exception", false),
    ("Classpath-exception-2.0", "Classpath exception 2.0", false),
    ("CLISP-exception-2.0", "CLISP exception 2.0", false),
    ("eCos-exception-2.0", "eCos exception 2.0", false),
    ("FLTK-exception", "FLTK exception", false),
    ("Font-exception-2.0", "Font exception 2.0", false),
    ("freertos-exception-2.0", "FreeRTOS Exception 2.0", false),
    ("GCC-exception-2.0", "GCC Runtime Library exception 2.0", false),
    ("GCC-exception-3.1", "GCC Runtime Library exception 3.1", false),
    ("Libtool-exception", "Libtool Exception", false),
    ("Linux-syscall-note", "Linux Syscall Note", false),
    ("LLVM-exception", "LLVM Exception", false),
    ("Nokia-Qt-exception-1.1", "Nokia Qt LGPL exception 1.1", true),
    (
        "OCaml-LGPL-linking-exception",
        "OCaml LGPL Linking Exception",
        false,
    ),
    (
        "OpenJDK-assembly-exception-1.0",
        "OpenJDK Assembly exception 1.0",
        false,
    ),
    ("Qt-GPL-exception-1.0", "Qt GPL exception 1.0", false),
    ("Qt-LGPL-exception-1.1", "Qt LGPL exception 1.1", false),
    ("Swift-exception", "Swift Exception", false),
    ("u-boot-exception-2.0", "U-Boot exception 2.0", false),
    (
        "Universal-FOSS-exception-1.0",
        "Universal FOSS Exception, Version 1.0",
        false,
    ),
    ("WxWindows-exception-3.1", "WxWindows Library Exception 3.1", false),
];

/// Strip the version qualifiers that an or-later family shares.
fn family_base(id: &str) -> &str {
    id.strip_suffix("-or-later")
        .or_else(|| id.strip_suffix("-only"))
        .or_else(|| id.strip_suffix('+'))
        .unwrap_or(id)
}

static LICENSE_MAP: Lazy<HashMap<&'static str, License>> = Lazy::new(|| {
    let ids: std::collections::HashSet<&str> = LICENSES.iter().map(|(id, _, _)| *id).collect();

    LICENSES
        .iter()
        .map(|&(id, name, deprecated)| {
            let or_later_eligible =
                ids.contains(format!("{}-or-later", family_base(id)).as_str());
            (
                id,
                License {
                    id,
                    name,
                    deprecated,
                    or_later_eligible,
                },
            )
        })
        .collect()
});

static EXCEPTION_MAP: Lazy<HashMap<&'static str, Exception>> = Lazy::new(|| {
    EXCEPTIONS
        .iter()
        .map(|&(id, name, deprecated)| {
            (
                id,
                Exception {
                    id,
                    name,
                    deprecated,
                },
            )
        })
        .collect()
});

/// Look up a license by its canonical (case-sensitive) identifier.
pub fn lookup_license(id: &str) -> Option<&'static License> {
    LICENSE_MAP.get(id)
}

/// Look up a license exception by its canonical (case-sensitive) identifier.
pub fn lookup_exception(id: &str) -> Option<&'static Exception> {
    EXCEPTION_MAP.get(id)
}

/// All catalog licenses, in no particular order.
pub fn licenses() -> impl Iterator<Item = &'static License> {
    LICENSE_MAP.values()
}

/// All catalog exceptions, in no particular order.
pub fn exceptions() -> impl Iterator<Item = &'static Exception> {
    EXCEPTION_MAP.values()
}

/// Map a common non-SPDX license name to its catalog entry.
///
/// Only whole strings are recognized; `"MIT License"` resolves, `"MIT License
/// or GPLv3"` does not. Names resolve to current (non-deprecated) ids.
pub fn resolve_alias(raw: &str) -> Option<&'static License> {
    let id = match raw.trim() {
        "Apache 2.0" | "Apache License 2.0" | "Apache License, Version 2.0" => "Apache-2.0",
        "MIT License" | "The MIT License" => "MIT",
        "BSD" | "BSD License" => "BSD-3-Clause",
        "BSD 2-Clause" | "Simplified BSD" => "BSD-2-Clause",
        "BSD 3-Clause" | "New BSD" | "Modified BSD" => "BSD-3-Clause",
        "GNU GPL v2" | "GNU General Public License v2" | "GPL v2" | "GPLv2" => "GPL-2.0-only",
        "GNU GPL v3" | "GNU General Public License v3" | "GPL v3" | "GPLv3" => "GPL-3.0-only",
        "GNU LGPL v2.1" | "LGPL v2.1" | "LGPLv2.1" => "LGPL-2.1-only",
        "GNU LGPL v3" | "LGPL v3" | "LGPLv3" => "LGPL-3.0-only",
        "Mozilla Public License 2.0" | "MPL 2.0" | "MPLv2" => "MPL-2.0",
        "ISC License" => "ISC",
        "CC0" | "Public Domain" => "CC0-1.0",
        "AGPL v3" | "AGPLv3" | "GNU AGPL v3" => "AGPL-3.0-only",
        _ => return None,
    };
    lookup_license(id)
}
