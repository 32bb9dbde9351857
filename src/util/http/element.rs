use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, turning the selector error into an `anyhow` error.
pub fn selector(css_selector: &str) -> Result<Selector> {
    Selector::parse(css_selector)
        .map_err(|why| anyhow!("Failed to Selector::parse '{}' because: {:?}", css_selector, why))
}

/// Collects, for every element matching `row_selector`, the trimmed text of its
/// `td` children in column order.
///
/// Rows are located by structure only. If the page layout changes the result is
/// simply empty; callers treat that as "no data".
///
/// # Example
///
/// ```ignore
/// use scraper::Html;
/// use crate::util::http::element::select_rows;
///
/// let html = Html::parse_document("<table><tbody><tr><td>a</td><td>b</td></tr></tbody></table>");
/// let rows = select_rows(&html, "tbody tr").unwrap();
/// assert_eq!(rows, vec![vec!["a".to_string(), "b".to_string()]]);
/// ```
pub fn select_rows(document: &Html, row_selector: &str) -> Result<Vec<Vec<String>>> {
    let rows = selector(row_selector)?;
    let cells = selector("td")?;

    Ok(document
        .select(&rows)
        .map(|row| row.select(&cells).map(|cell| element_text(&cell)).collect())
        .collect())
}

/// Collects the trimmed text of every element matching `css_selector`, in document
/// order, as one flat list.
pub fn select_texts(document: &Html, css_selector: &str) -> Result<Vec<String>> {
    let s = selector(css_selector)?;
    Ok(document.select(&s).map(|e| element_text(&e)).collect())
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
        <html><body>
        <table>
            <thead><tr><th>Date</th><th>Open</th></tr></thead>
            <tbody>
                <tr class="row"><td> Apr 5, 2024 </td><td>169.59</td></tr>
                <tr class="row"><td>Apr 4, 2024</td><td><span>170.29</span></td></tr>
                <tr class="other"><td>Apr 3, 2024</td><td>168.79</td></tr>
            </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_select_rows() {
        let document = Html::parse_document(TABLE);
        let rows = select_rows(&document, "tbody tr.row").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["Apr 5, 2024".to_string(), "169.59".to_string()],
                vec!["Apr 4, 2024".to_string(), "170.29".to_string()],
            ]
        );
    }

    #[test]
    fn test_select_rows_layout_changed() {
        let document = Html::parse_document(TABLE);
        let rows = select_rows(&document, "tbody tr.svelte-gone").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_select_texts() {
        let document = Html::parse_document(TABLE);
        let texts = select_texts(&document, "td").unwrap();
        assert_eq!(texts.len(), 6);
        assert_eq!(texts[0], "Apr 5, 2024");
        assert_eq!(texts[5], "168.79");
    }

    #[test]
    fn test_invalid_selector() {
        let document = Html::parse_document(TABLE);
        assert!(select_texts(&document, "td[").is_err());
    }
}
