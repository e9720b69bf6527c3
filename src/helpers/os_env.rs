use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;

use log::warn;

/// Reads every variable currently defined in the process environment.
///
/// Names or values that are not valid unicode are decoded lossily, so every
/// OS variable has an entry.
pub fn load_os_environment() -> BTreeMap<String, String> {
    collect_vars(env::vars_os())
}

fn collect_vars<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .map(|(key, val)| (decode(key, "name"), decode(val, "value")))
        .collect()
}

fn decode(raw: OsString, what: &str) -> String {
    raw.into_string().unwrap_or_else(|raw| {
        let lossy = raw.to_string_lossy().into_owned();
        warn!("Environment variable {} {:?} is not valid unicode, decoded as '{}'", what, raw, lossy);
        lossy
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_std_vars() {
        let loaded = load_os_environment();
        let expected: BTreeMap<String, String> = env::vars_os()
            .map(|(k, v)| (k.to_string_lossy().into_owned(), v.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_path_is_loaded_when_present() {
        if let Ok(path) = env::var("PATH") {
            assert_eq!(load_os_environment().get("PATH"), Some(&path));
        }
    }

    #[test]
    fn test_unicode_entries_kept_verbatim() {
        let vars = collect_vars([(OsString::from("LANG"), OsString::from("C.UTF-8"))]);
        assert_eq!(vars.get("LANG").map(String::as_str), Some("C.UTF-8"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_entries_decoded_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let vars = collect_vars([
            (OsString::from("BAD_VALUE"), OsString::from_vec(b"ab\xffcd".to_vec())),
            (OsString::from_vec(b"BAD_\xfeNAME".to_vec()), OsString::from("x")),
        ]);

        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("BAD_VALUE").map(String::as_str), Some("ab\u{FFFD}cd"));
        assert_eq!(vars.get("BAD_\u{FFFD}NAME").map(String::as_str), Some("x"));
    }
}
