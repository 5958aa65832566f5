//! Pinyin rendering of Chinese text

use pinyin::ToPinyin;

/// Tone-marked pinyin, one token per Han character
///
/// Runs of other characters are kept verbatim as a single token and
/// whitespace only separates tokens.
pub fn to_pinyin(text: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();
    let mut run = String::new();

    for c in text.chars() {
        if let Some(syllable) = c.to_pinyin() {
            flush(&mut run, &mut tokens);
            tokens.push(syllable.with_tone().to_string());
        } else if c.is_whitespace() {
            flush(&mut run, &mut tokens);
        } else {
            run.push(c);
        }
    }
    flush(&mut run, &mut tokens);

    tokens.join(" ")
}

fn flush(run: &mut String, tokens: &mut Vec<String>) {
    if !run.is_empty() {
        tokens.push(std::mem::take(run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_han_characters() {
        assert_eq!(to_pinyin("你好"), "nǐ hǎo");
        assert_eq!(to_pinyin("世界"), "shì jiè");
    }

    #[test]
    fn test_punctuation_and_latin_runs() {
        assert_eq!(to_pinyin("你好，世界！"), "nǐ hǎo ， shì jiè ！");
        assert_eq!(to_pinyin("abc你好 x"), "abc nǐ hǎo x");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(to_pinyin(""), "");
        assert_eq!(to_pinyin("  \n "), "");
    }
}
