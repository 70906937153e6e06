use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.limit, 10);
}

#[test]
fn test_page_request_offset() {
    assert_eq!(PageRequest::new(1, 20).offset(), 0);
    assert_eq!(PageRequest::new(2, 20).offset(), 20);
    assert_eq!(PageRequest::new(3, 10).offset(), 20);
}

#[test]
fn test_page_request_is_clamped() {
    let request = PageRequest::new(0, 0);
    assert_eq!(request.page, 1);
    assert_eq!(request.limit, 1);

    let request = PageRequest::new(4, 5000);
    assert_eq!(request.page, 4);
    assert_eq!(request.limit, MAX_LIMIT);
}

#[test]
fn test_page_response_new() {
    let data = vec![1, 2, 3];
    let response = PageResponse::new(data.clone(), PageRequest::new(1, 10), 3);

    assert!(response.success);
    assert_eq!(response.data, data);
    assert_eq!(
        response.pagination,
        PageMeta {
            total: 3,
            page: 1,
            limit: 10,
            pages: 1
        }
    );
}

#[test]
fn test_page_response_pagination() {
    // 25 items, 10 per page -> 3 pages
    let response: PageResponse<i32> = PageResponse::new(vec![], PageRequest::new(1, 10), 25);
    assert_eq!(response.pagination.pages, 3);
}

#[test]
fn test_page_response_empty() {
    let response: PageResponse<i32> = PageResponse::new(vec![], PageRequest::new(1, 10), 0);
    assert_eq!(response.pagination.pages, 1);
}

#[test]
fn test_page_response_serializes_envelope() {
    let response = PageResponse::new(vec!["a"], PageRequest::new(2, 1), 2);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0], "a");
    assert_eq!(json["pagination"]["page"], 2);
    assert_eq!(json["pagination"]["pages"], 2);
}
