use crate::error::FetchError;
use scraper::{ElementRef, Selector};

/// Compiles a CSS selector, reporting failures as parse errors
pub fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("invalid selector {}: {:?}", css, e)))
}

/// Text content of `element` with whitespace collapsed to single spaces
pub fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First element under `root` matching `css`
pub fn first<'a>(root: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>, FetchError> {
    let selector = selector(css)?;
    Ok(root.select(&selector).next())
}

/// Joins `href` onto `base`, keeping absolute links as they are
pub fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches(['.', '/'])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_collapse_text() {
        let doc = Html::parse_fragment("<h3>  Blue\n <b>Tang</b>  </h3>");
        let h3 = first(doc.root_element(), "h3").unwrap().unwrap();
        assert_eq!(collapse_text(h3), "Blue Tang");
    }

    #[test]
    fn test_absolutize() {
        assert_eq!(
            absolutize("https://fishbase.se", "../summary/Betta-splendens.html"),
            "https://fishbase.se/summary/Betta-splendens.html"
        );
        assert_eq!(
            absolutize("https://www.liveaquaria.com/", "/images/tang.jpg"),
            "https://www.liveaquaria.com/images/tang.jpg"
        );
        assert_eq!(absolutize("https://a.b", "https://c.d/x"), "https://c.d/x");
    }

    #[test]
    fn test_bad_selector() {
        assert!(matches!(selector("div[["), Err(FetchError::Parse(_))));
    }
}
