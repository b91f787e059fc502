pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_index: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    /// A zero page size is bumped to 1 so slicing never divides by zero.
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    pub clamped_page: usize,
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(page_index: usize, len: usize, page_size: usize) -> usize {
    page_index.max(1).min(total_pages(len, page_size))
}

/// Slices out the requested page, clamping the index into range first.
pub fn paginate<T>(items: &[T], page: PageSpec) -> Page<'_, T> {
    let size = page.page_size.max(1);
    let total_pages = total_pages(items.len(), size);
    let clamped_page = clamp_page(page.page_index, items.len(), size);
    let start = ((clamped_page - 1) * size).min(items.len());
    let end = (start + size).min(items.len());
    Page {
        items: &items[start..end],
        total_pages,
        clamped_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_index_means_first_page() {
        let data = [1, 2, 3];
        let page = paginate(&data, PageSpec::new(0, 2));
        assert_eq!(page.clamped_page, 1);
        assert_eq!(page.items, &[1, 2]);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        assert_eq!(PageSpec::new(1, 0).page_size, 1);
        let data = [1, 2, 3];
        let page = paginate(
            &data,
            PageSpec {
                page_index: 2,
                page_size: 0,
            },
        );
        assert_eq!(page.items, &[2]);
        assert_eq!(page.total_pages, 3);
    }
}
