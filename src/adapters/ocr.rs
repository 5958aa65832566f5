//! OCR (Optical Character Recognition) using rusty-tesseract

use image::RgbaImage;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};

use super::OcrError;

/// One recognized line of text
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
}

/// A single word reported by the engine
#[derive(Debug, Clone)]
pub struct Word {
    pub block_num: i32,
    pub par_num: i32,
    pub line_num: i32,
    pub word_num: i32,
    pub conf: f32,
    pub text: String,
}

impl From<rusty_tesseract::Data> for Word {
    fn from(d: rusty_tesseract::Data) -> Self {
        Self {
            block_num: d.block_num,
            par_num: d.par_num,
            line_num: d.line_num,
            word_num: d.word_num,
            conf: d.conf,
            text: d.text,
        }
    }
}

/// Run OCR on a captured image
///
/// An empty image is not handed to the engine; it yields no fragments.
pub fn recognize(img: &RgbaImage, lang: &str) -> Result<Vec<Fragment>, OcrError> {
    use rusty_tesseract::{Args, Image};

    if img.width() == 0 || img.height() == 0 {
        info!("Empty image, skipping OCR");
        return Ok(Vec::new());
    }

    info!(
        "Running OCR ({}) on {}x{} image...",
        lang,
        img.width(),
        img.height()
    );

    let dynamic_img = image::DynamicImage::ImageRgba8(img.clone());

    // Tesseract works best with glyphs at least 20px tall; snips are often smaller
    let min_dimension = img.width().min(img.height());
    let processed_img = if min_dimension < 100 {
        dynamic_img.resize(
            img.width() * 3,
            img.height() * 3,
            image::imageops::FilterType::Lanczos3,
        )
    } else {
        dynamic_img
    };

    let tess_img =
        Image::from_dynamic_image(&processed_img).map_err(|e| OcrError::Engine(e.to_string()))?;

    let args = Args {
        lang: lang.to_string(),
        config_variables: HashMap::new(),
        dpi: Some(300),
        psm: Some(6), // Assume a single uniform block of text
        oem: Some(3),
    };

    let output =
        rusty_tesseract::image_to_data(&tess_img, &args).map_err(|e| OcrError::Engine(e.to_string()))?;
    debug!("Tesseract returned {} data entries", output.data.len());

    let fragments = assemble_lines(output.data.into_iter().map(Word::from));
    info!("Recognized {} line(s)", fragments.len());
    Ok(fragments)
}

/// Group words into lines, ordered as the engine numbered them
pub fn assemble_lines(words: impl IntoIterator<Item = Word>) -> Vec<Fragment> {
    let mut lines: BTreeMap<(i32, i32, i32), Vec<Word>> = BTreeMap::new();
    for word in words {
        if word.text.trim().is_empty() || word.conf < 0.0 {
            continue;
        }
        lines
            .entry((word.block_num, word.par_num, word.line_num))
            .or_default()
            .push(word);
    }

    lines
        .into_values()
        .filter_map(|mut words| {
            words.sort_by_key(|w| w.word_num);
            let text = join_words(words.iter().map(|w| w.text.trim()));
            (!text.is_empty()).then_some(Fragment { text })
        })
        .collect()
}

/// Join the texts of all fragments with a single space
pub fn join_fragments(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// CJK words are glued together; anything else is separated by a space
fn join_words<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for word in words {
        let glue = match (line.chars().last(), word.chars().next()) {
            (Some(prev), Some(next)) => !(is_cjk(prev) && is_cjk(next)),
            _ => false,
        };
        if glue {
            line.push(' ');
        }
        line.push_str(word);
    }
    line
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'   // punctuation
        | '\u{3400}'..='\u{4DBF}' // extension A
        | '\u{4E00}'..='\u{9FFF}' // unified ideographs
        | '\u{F900}'..='\u{FAFF}' // compatibility ideographs
        | '\u{FF00}'..='\u{FFEF}' // full-width forms
    )
}
