/// Parse a 1-based page list such as `"1,3-5"` into sorted, de-duplicated
/// 0-based indices. Empty items are ignored.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (
                page_number(start, page_count)?,
                page_number(end, page_count)?,
            ),
            None => {
                let page = page_number(part, page_count)?;
                (page, page)
            }
        };
        if start > end {
            return Err(format!("range {part} runs backwards"));
        }
        pages.extend(start - 1..end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn page_number(text: &str, page_count: usize) -> Result<usize, String> {
    let text = text.trim();
    let page: usize = text
        .parse()
        .map_err(|_| format!("invalid page number: '{text}'"))?;
    if page == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if page > page_count {
        return Err(format!(
            "page {page} exceeds document page count ({page_count})"
        ));
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singles_and_ranges() {
        assert_eq!(parse_page_range("3", 5).unwrap(), vec![2]);
        assert_eq!(parse_page_range("2-4", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_page_range("1,3-5", 5).unwrap(), vec![0, 2, 3, 4]);
    }

    #[test]
    fn overlapping_items_are_merged() {
        assert_eq!(parse_page_range("2-3,1,3", 5).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn whitespace_and_empty_items() {
        assert_eq!(parse_page_range(" 1 , , 3 - 4 ", 5).unwrap(), vec![0, 2, 3]);
        assert!(parse_page_range("", 5).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(parse_page_range("0", 5).unwrap_err().contains("invalid"));
        assert!(parse_page_range("6", 5).unwrap_err().contains("exceeds"));
        assert!(parse_page_range("x", 5).unwrap_err().contains("invalid page number"));
        assert!(parse_page_range("4-2", 5).unwrap_err().contains("backwards"));
    }
}
