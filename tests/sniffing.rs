use rowscan::sniffer::sniff;
use rowscan::types::RowDelim;
use rowscan::Error;

#[test]
fn sniffs_comma_lf_no_quote() {
    let schema = sniff("a,b,c\n1,2,3\n").unwrap();
    assert_eq!(schema.delimiter, b',');
    assert_eq!(schema.row_delim, RowDelim::Lf);
    assert_eq!(schema.quote, None);
    assert!(schema.fields.is_empty());
}

#[test]
fn quote_character_anywhere_enables_quoting() {
    let schema = sniff("a,b,c\n1,\"two\",3\n").unwrap();
    assert_eq!(schema.quote, Some(b'"'));
}

#[test]
fn candidate_priority_is_tab_pipe_semicolon_comma() {
    assert_eq!(sniff("a\tb|c;d,e\n").unwrap().delimiter, b'\t');
    assert_eq!(sniff("a|b;c,d\n").unwrap().delimiter, b'|');
    assert_eq!(sniff("a;b,c\n").unwrap().delimiter, b';');
    assert_eq!(sniff("a,b\n").unwrap().delimiter, b',');
}

#[test]
fn crlf_header_terminator_sets_row_delim_for_whole_input() {
    let schema = sniff("x,y\r\n1,2\r\n").unwrap();
    assert_eq!(schema.row_delim, RowDelim::CrLf);
}

#[test]
fn missing_terminator_defaults_to_lf() {
    let schema = sniff("x;y;z").unwrap();
    assert_eq!(schema.row_delim, RowDelim::Lf);
}

#[test]
fn sniff_fails_without_candidate_delimiter() {
    let err = sniff("plain text header\nmore text\n").unwrap_err();
    assert!(matches!(err, Error::NoDelimiterFound));
    assert!(err.to_string().contains("no column delimiter"));
}
