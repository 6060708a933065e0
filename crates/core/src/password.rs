//! Initial-password generation for newly created users.
//!
//! The generated password is emailed to the user by the notification
//! service; `must_change_password` forces a rotation on first login.

use rand::seq::{IndexedRandom, SliceRandom};

/// Default generated password length.
pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%^&*";

/// Generate a strong random password of `length` characters.
///
/// Contains at least one lowercase letter, one uppercase letter, one
/// digit, and one special character; the remainder is drawn from the
/// combined pool. Lengths below 4 are clamped to 4 so every class fits.
pub fn generate(length: usize) -> String {
    let length = length.max(4);
    let mut rng = rand::rng();

    let pool: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL].concat();

    let mut chars: Vec<u8> = vec![
        *LOWERCASE.choose(&mut rng).unwrap(),
        *UPPERCASE.choose(&mut rng).unwrap(),
        *DIGITS.choose(&mut rng).unwrap(),
        *SPECIAL.choose(&mut rng).unwrap(),
    ];
    while chars.len() < length {
        chars.push(*pool.choose(&mut rng).unwrap());
    }
    chars.shuffle(&mut rng);

    String::from_utf8(chars).expect("password charset is ASCII")
}

/// Generate a password of the default length.
pub fn generate_default() -> String {
    generate(DEFAULT_PASSWORD_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate(12).len(), 12);
        assert_eq!(generate(20).len(), 20);
    }

    #[test]
    fn short_lengths_clamped_to_fit_all_classes() {
        assert_eq!(generate(1).len(), 4);
    }

    #[test]
    fn contains_all_character_classes() {
        for _ in 0..20 {
            let pw = generate_default();
            assert!(pw.bytes().any(|b| b.is_ascii_lowercase()), "{pw}");
            assert!(pw.bytes().any(|b| b.is_ascii_uppercase()), "{pw}");
            assert!(pw.bytes().any(|b| b.is_ascii_digit()), "{pw}");
            assert!(pw.bytes().any(|b| SPECIAL.contains(&b)), "{pw}");
        }
    }

    #[test]
    fn successive_passwords_differ() {
        assert_ne!(generate_default(), generate_default());
    }
}
