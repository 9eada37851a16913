use groupcast_error::{InvalidNameError, NameKind};
use rand::Rng;

/// Длина сгенерированных имён каналов.
pub const RANDOM_NAME_LEN: usize = 12;

const ASCII_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `true`, если `name` — идентификатор: непустой, из ASCII-букв, цифр и
/// `_`, не начинается с цифры.
///
/// Имена служат ключами локального индекса и именами ключей и полей во
/// внешнем хранилище, поэтому правило узкое.
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Проверяет `name` на правило идентификатора.
pub fn validate_name(
    kind: NameKind,
    name: &str,
) -> Result<(), InvalidNameError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(InvalidNameError::new(kind, name))
    }
}

/// Случайное имя канала из [`RANDOM_NAME_LEN`] ASCII-букв.
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_NAME_LEN)
        .map(|_| ASCII_LETTERS[rng.gen_range(0..ASCII_LETTERS.len())] as char)
        .collect()
}
