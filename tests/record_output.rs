//! Record Output Tests
//!
//! Field rendering for records pulled from a query, and that only the
//! requested fields are ever resolved.

mod common;

use serde_json::{json, Value};

use common::{Library, Media};
use media_query::mime::MimeTypeRegistry;
use media_query::{QuerySpec, RecordField};

#[test]
fn test_default_row() {
    let library = Library::new().with(Media::image(12, 800, 600));
    let mime = MimeTypeRegistry::default();

    let mut stream = library.engine(&mime).execute(&QuerySpec::new()).unwrap();
    let record = stream.next().unwrap().unwrap();
    let row = record.to_row(&RecordField::DEFAULT).unwrap();

    let values: Vec<Value> = row.into_iter().map(|(_, v)| v).collect();
    assert_eq!(
        values,
        vec![
            json!(12),
            json!("2022/05/photo-12.jpg"),
            json!("2022-05-17 09:30:00"),
            json!("inherit"),
        ]
    );
    assert!(library.metadata_lookups.borrow().is_empty());
    assert_eq!(library.stat_calls.get(), 0);
    assert_eq!(library.reference_calls.get(), 0);
}

#[test]
fn test_requested_fields_in_order() {
    let library = Library::new()
        .with(Media::image(3, 1024, 768).parent(77))
        .content("see 2022/05/photo-3.jpg");
    let mime = MimeTypeRegistry::default();

    let fields = RecordField::parse_list("media_size,file_size,post_parent,is_in_use,media_type")
        .unwrap();
    let mut stream = library.engine(&mime).execute(&QuerySpec::new()).unwrap();
    let record = stream.next().unwrap().unwrap();
    let row = record.to_row(&fields).unwrap();

    let tags: Vec<&str> = row.iter().map(|(f, _)| f.as_str()).collect();
    assert_eq!(
        tags,
        vec!["media_size", "file_size", "post_parent", "is_in_use", "media_type"]
    );
    assert_eq!(row[0].1, json!("1024x768"));
    // 1024 * 768 bytes
    assert_eq!(row[1].1, json!("768 KB"));
    assert_eq!(row[2].1, json!("post-77"));
    assert_eq!(row[3].1, json!(true));
    assert_eq!(row[4].1, json!("image"));
}

#[test]
fn test_unknown_values_render_null() {
    let library = Library::new().with(Media::video(8).bytes(None));
    let mime = MimeTypeRegistry::default();

    let mut stream = library.engine(&mime).execute(&QuerySpec::new()).unwrap();
    let record = stream.next().unwrap().unwrap();

    assert_eq!(record.field_value(RecordField::MediaWidth).unwrap(), Value::Null);
    assert_eq!(record.field_value(RecordField::MediaSize).unwrap(), Value::Null);
    assert_eq!(record.field_value(RecordField::FileSize).unwrap(), Value::Null);
    assert_eq!(record.field_value(RecordField::IsFileExists).unwrap(), json!(false));
    assert_eq!(record.field_value(RecordField::MediaType).unwrap(), json!("video"));
}

#[test]
fn test_fields_resolve_once() {
    let library = Library::new().with(Media::image(1, 10, 10));
    let mime = MimeTypeRegistry::default();

    let mut stream = library.engine(&mime).execute(&QuerySpec::new()).unwrap();
    let record = stream.next().unwrap().unwrap();

    for _ in 0..3 {
        record.field_value(RecordField::MediaWidth).unwrap();
        record.field_value(RecordField::MediaHeight).unwrap();
        record.field_value(RecordField::FileSize).unwrap();
        record.field_value(RecordField::IsInUse).unwrap();
    }
    assert_eq!(*library.metadata_lookups.borrow(), vec![1]);
    assert_eq!(library.stat_calls.get(), 1);
    // post thumbnail, term thumbnail, content
    assert_eq!(library.reference_calls.get(), 3);
}

#[test]
fn test_filtered_field_reused_by_output() {
    let library = Library::new().with(Media::image(1, 400, 300));
    let mime = MimeTypeRegistry::default();

    let mut spec = QuerySpec::new();
    spec.set_media_width_min(Some(100));

    let mut stream = library.engine(&mime).execute(&spec).unwrap();
    let record = stream.next().unwrap().unwrap();
    assert_eq!(record.field_value(RecordField::MediaWidth).unwrap(), json!(400));
    assert_eq!(*library.metadata_lookups.borrow(), vec![1]);
}

#[test]
fn test_unknown_field_tag_rejected() {
    let err = RecordField::parse_list("id,resolution").unwrap_err();
    assert!(err.contains("resolution"));
}
