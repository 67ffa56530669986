// ==========================================
// Internationalization (i18n)
// ==========================================
// rust-i18n with Persian as the fallback language; English available
// for log-friendly output.
// The rust_i18n::i18n! macro is initialized in lib.rs.
// ==========================================

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Set the active language ("fa" or "en").
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate with `%{name}` placeholder substitution.
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // the locale is global state and tests run in parallel
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("fa");
        assert_eq!(current_locale(), "fa");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("fa");
        assert_eq!(t("common.success"), "عملیات موفق");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("fa");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("fa");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert!(msg.contains("/tmp/test.csv"));

        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
        assert!(msg.contains("File not found"));

        set_locale("fa");
    }
}
