//! 顯示名稱修復

/// 以 Latin-1 誤解碼的 UTF-8 常見特徵字元
const MOJIBAKE_MARKERS: [char; 6] = ['Ã', 'Â', 'Ø', 'Ù', 'Ð', 'Ý'];

/// 修復被誤以 Latin-1 解碼的 UTF-8 文字（例如 `Ø§Ù„...`）
///
/// 僅在出現特徵字元時嘗試；任何字元超出 Latin-1 或重新解碼失敗時返回原文。
pub fn repair_mojibake(text: &str) -> String {
    if !text.chars().any(|c| MOJIBAKE_MARKERS.contains(&c)) {
        return text.to_string();
    }

    let bytes: Option<Vec<u8>> = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    bytes
        .and_then(|b| String::from_utf8(b).ok())
        .unwrap_or_else(|| text.to_string())
}
