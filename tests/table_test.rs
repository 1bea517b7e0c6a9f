#![allow(clippy::expect_used)]

mod common;

use common::list_page;
use recordminer::extract_from_whole_page;
use recordminer::table::{csv_cell, csv_table, render_csv, render_html, render_text};

#[test]
fn csv_escaping_rules() {
    assert_eq!(csv_cell(r#"a,"b""#), r#""a,""b""""#);
    assert_eq!(csv_cell("=SUM(A1:A9)"), "SUM(A1:A9)");
    assert_eq!(csv_cell("-1.5"), "1.5");
    assert_eq!(csv_cell("two\r\nlines"), "two lines");
    assert_eq!(csv_cell(""), "");
}

#[test]
fn extracted_cells_are_csv_escaped() {
    let rows: [&[&str]; 3] = [
        &["Widget, large", "=10*2", "say \"hi\""],
        &["Widget, small", "-5", "plain"],
        &["Gadget", "7", "ok"],
    ];
    let fixture = list_page(&rows);

    let result = extract_from_whole_page(&fixture.page).expect("extraction succeeds");

    assert_eq!(
        result.csv_table[0],
        vec!["\"Widget, large\"", "10*2", "\"say \"\"hi\"\"\""]
    );
    assert_eq!(
        result.to_csv(),
        "\"Widget, large\",10*2,\"say \"\"hi\"\"\"\n\"Widget, small\",5,plain\nGadget,7,ok\n"
    );
    // The content table keeps the raw values.
    assert_eq!(result.content_table[1][2], "-5");
}

#[test]
fn html_rendering_wraps_rows_and_cells() {
    let rows: [&[&str]; 3] = [&["<a>", "1"], &["b&c", "2"], &["d", "3"]];
    let fixture = list_page(&rows);

    let result = extract_from_whole_page(&fixture.page).expect("extraction succeeds");
    let html = result.to_html();

    assert!(html.starts_with("<table style=\"width:100%;\"><tr><td>1</td><td>&lt;a&gt;</td><td>1</td></tr>"));
    assert!(html.contains("<tr><td>2</td><td>b&amp;c</td><td>2</td></tr>"));
    assert!(html.ends_with("</tr></table>"));
}

#[test]
fn text_columns_use_character_widths() {
    let content = vec![
        vec!["1".to_string(), "na\u{ef}ve".to_string()],
        vec!["2".to_string(), "x".to_string()],
    ];
    let text = render_text(&content);
    assert_eq!(text, "1|na\u{ef}ve|\n-------\n2|x    |\n-------\n");
}

#[test]
fn empty_table_renders_empty() {
    let empty: Vec<Vec<String>> = Vec::new();
    assert_eq!(render_text(&empty), "");
    assert_eq!(render_csv(&csv_table(&empty)), "");
    assert_eq!(render_html(&empty), "<table style=\"width:100%;\"></table>");
}
