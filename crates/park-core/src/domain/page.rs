//! 페이지 조회 타입.

use serde::Serialize;

/// 기본 페이지 크기.
pub const DEFAULT_PAGE_SIZE: u32 = 5;
/// 최대 페이지 크기.
pub const MAX_PAGE_SIZE: u32 = 100;

/// 페이지 요청 (0부터 시작).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// 크기를 `1..=MAX_PAGE_SIZE` 범위로 맞춰 생성합니다.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// 건너뛸 행 수.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// 페이지 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// 현재 페이지 번호
    pub number: u32,
    /// 페이지 크기
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size);
        let total_pages = total_elements.div_ceil(size);
        let number = u64::from(request.page);
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: number + 1 >= total_pages,
        }
    }

    /// 내용 타입 변환.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 1000).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 5).offset(), 15);
    }

    #[test]
    fn test_page_metadata() {
        let page = Page::new(vec![1, 2, 3, 4, 5], PageRequest::new(0, 5), 12);
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);

        let page = Page::new(vec![11, 12], PageRequest::new(2, 5), 12);
        assert!(!page.first);
        assert!(page.last);

        let empty: Page<i32> = Page::new(vec![], PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.first && empty.last);
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2], PageRequest::new(0, 5), 2).map(|n| n * 10);
        assert_eq!(page.content, vec![10, 20]);
        assert_eq!(page.total_elements, 2);
    }
}
