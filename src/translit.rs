//! Cyrillic-to-Latin transliteration for search matching.
//!
//! The catalog stores Russian text while users often type queries on a
//! Latin keyboard (and vice versa). Both comparison sides are run through
//! the same fixed substitution table so substring matching works across
//! scripts.

use unicode_script::{Script, UnicodeScript};

/// Check if a string contains only Latin characters (plus common
/// punctuation/digits). Such text transliterates to itself, so the table
/// substitution can be skipped entirely.
pub fn is_all_latin(s: &str) -> bool {
    s.chars().all(|c| {
        c.is_ascii()
            || c.script() == Script::Latin
            || c.script() == Script::Common
            || c.script() == Script::Inherited
    })
}

/// Latin replacement for a lowercase Cyrillic letter, or None if the
/// character is not in the table and passes through unchanged.
///
/// The table is total over the 33 lowercase Russian letters. The hard and
/// soft signs map to the empty string: they carry no sound of their own,
/// so a keyboard-transliterated query never contains them.
fn latin_of(c: char) -> Option<&'static str> {
    let mapped = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}

/// Transliterate a string to its Latin approximation.
///
/// The input is lowercased first, then every recognized Cyrillic letter is
/// replaced by its table entry (0-2 Latin characters). Everything else,
/// Latin letters, digits, punctuation and whitespace included, passes
/// through unchanged. Total over any input; empty maps to empty. The
/// output is not re-mapped, so the function is applied exactly once per
/// comparison side.
pub fn transliterate(s: &str) -> String {
    let lower = s.to_lowercase();
    if is_all_latin(&lower) {
        return lower;
    }

    let mut out = String::with_capacity(lower.len());
    for c in lower.chars() {
        match latin_of(c) {
            Some(rep) => out.push_str(rep),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_all_latin() {
        assert!(is_all_latin("Warm hat"));
        assert!(is_all_latin("123-456, sale!"));
        assert!(is_all_latin(""));
        assert!(!is_all_latin("Шапка"));
        assert!(!is_all_latin("Hat Шапка")); // Mixed
    }

    #[test]
    fn test_transliterate_basic_words() {
        assert_eq!(transliterate("Москва"), "moskva");
        assert_eq!(transliterate("Шапка"), "shapka");
        assert_eq!(transliterate("Тёплая"), "tyoplaya");
        assert_eq!(transliterate("щука"), "schuka");
    }

    #[test]
    fn test_transliterate_lowercases_input() {
        assert_eq!(transliterate("ХОЛОДИЛЬНИК"), "holodilnik");
        assert_eq!(transliterate("Warm HAT"), "warm hat");
    }

    #[test]
    fn test_hard_and_soft_signs_are_deleted() {
        assert_eq!(transliterate("объект"), "obekt");
        assert_eq!(transliterate("соль"), "sol");
    }

    #[test]
    fn test_latin_digits_punctuation_pass_through() {
        assert_eq!(transliterate("sale 50%!"), "sale 50%!");
        assert_eq!(transliterate("шапка-2, new"), "shapka-2, new");
    }

    #[test]
    fn test_empty_maps_to_empty() {
        assert_eq!(transliterate(""), "");
    }

    #[test]
    fn test_deterministic() {
        let s = "Зимняя куртка № 7";
        assert_eq!(transliterate(s), transliterate(s));
    }

    #[test]
    fn test_table_is_total_over_russian_alphabet() {
        for c in "абвгдеёжзийклмнопрстуфхцчшщъыьэюя".chars() {
            assert!(latin_of(c).is_some(), "no mapping for '{}'", c);
        }
    }

    #[test]
    fn test_replacements_are_short_ascii() {
        for c in "абвгдеёжзийклмнопрстуфхцчшщъыьэюя".chars() {
            let rep = latin_of(c).unwrap();
            assert!(rep.len() <= 3, "'{}' expands to '{}'", c, rep);
            assert!(rep.chars().all(|r| r.is_ascii_lowercase()));
        }
    }
}
