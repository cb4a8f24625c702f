use scraper::Html;

use super::councils::councils_on_page;
use super::extract::{
    COUNCIL_COLUMN, CouncilTable, PARTY_COLUMN, PartyIntervals, REGION_COLUMN,
    extract_council_table,
};
use super::normalize::{BIRTH_DATE_COLUMN, BIRTHPLACE_COLUMN, NAME_COLUMN, RecordNormalizer};
use super::regions::resolve_region_links;
use crate::error::HarvestError;
use crate::table::{Record, RecordSet};

const BASE_URL: &str = "https://www.cvk.gov.ua/pls/vm2020/";

const TOP_PAGE: &str = r#"
<html><body>
<table>
  <tr><td>Регіон</td><td>Рад</td><td>Депутатів</td><td>Кандидатів</td></tr>
  <tr><td>Вінницька</td><td>63</td><td>1742</td><td><a href="pvm035_35.html">8914</a></td></tr>
  <tr><td>Волинська</td><td>54</td><td>1450</td><td><a href="pvm035_07.html">6120</a></td></tr>
  <tr><td>Житомирська</td><td>58</td><td>1604</td><td>7311</td></tr>
</table>
</body></html>
"#;

const REGION_PAGE: &str = r#"
<html><body>
<table><tr><td>Місцеві вибори 2020</td></tr></table>
<table><tr><td>Навігація</td></tr></table>
<table>
  <tr><td>Ради</td></tr>
  <tr><td><a href="pvm056_1.html">Вінницька область, Вінницька міська рада</a></td></tr>
  <tr><td><a href="pvm056_2.html">Вінницька область, Жмеринська міська рада</a></td></tr>
  <tr><td>порожній рядок</td></tr>
  <tr><td><a href="pvm056_3.html">Вінницька область, Козятинська міська рада</a></td></tr>
</table>
</body></html>
"#;

const COUNCIL_PAGE: &str = r#"
<html><body>
<table><tr><td>Навігація</td></tr></table>
<table>
  <tr>
    <th>Прізвище, ім'я, по батькові</th>
    <th>Відомості про кандидата</th>
    <th>№ ТВО, за яким закріплено</th>
  </tr>
  <tr><td>ПОЛІТИЧНА ПАРТІЯ «Сила громад»</td><td></td><td></td></tr>
  <tr><td>ІваненкоПетро Іванович</td><td>м. Вінниця, 05.03.1980</td><td>1</td></tr>
  <tr><td>Коваль Марія Степанівна</td><td>м. Київ, 12.11.1975</td><td>2</td></tr>
  <tr><td>ПОЛІТИЧНА ПАРТІЯ «Єдність»</td><td></td><td></td></tr>
  <tr><td>Шевченко Олег Тарасович</td><td>с. Стрижавка, 01.01.1990</td><td>3</td></tr>
</table>
</body></html>
"#;

const FLAT_COUNCIL_PAGE: &str = r#"
<html><body>
<table>
  <tr>
    <th>Прізвище, ім'я, по батькові</th>
    <th>Відомості про кандидата</th>
  </tr>
  <tr><td>Бондаренко Ігор Павлович</td><td>м. Луцьк, 17.07.1982</td></tr>
  <tr><td>Ткачук Оксана Василівна</td><td>м. Ковель, 23.02.1969</td></tr>
</table>
</body></html>
"#;

#[test]
fn party_intervals_follow_the_worked_boundary_layout() {
    // Party-header rows at {2, 7} in a 9-row table give boundaries [7, 8].
    let intervals = PartyIntervals::new(
        vec![7, 8],
        vec!["Party A".to_string(), "Party B".to_string()],
    );

    assert_eq!(intervals.label_for(4), Some("Party A"));
    assert_eq!(intervals.label_for(8), Some("Party B"));
}

#[test]
fn party_intervals_assign_exactly_one_label_per_row() {
    let intervals = PartyIntervals::new(
        vec![3, 6, 9],
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
    );

    for index in 0..12 {
        assert!(intervals.label_for(index).is_some());
    }
    // Rows between two consecutive headers all carry the earlier label.
    assert_eq!(intervals.label_for(4), Some("b"));
    assert_eq!(intervals.label_for(5), Some("b"));
    // Trailing rows past the final boundary fall back to the last label.
    assert_eq!(intervals.label_for(11), Some("c"));
}

#[test]
fn resolve_region_links_reads_the_requested_column() {
    let document = Html::parse_document(TOP_PAGE);
    let fragments = vec!["Вінницька".to_string(), "Волинська".to_string()];

    let links = resolve_region_links(&document, &fragments, 4, BASE_URL).unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0].region, "Вінницька область");
    assert_eq!(links[0].url, format!("{BASE_URL}pvm035_35.html"));
    assert_eq!(links[1].url, format!("{BASE_URL}pvm035_07.html"));
}

#[test]
fn resolve_region_links_fails_on_unknown_fragment() {
    let document = Html::parse_document(TOP_PAGE);
    let fragments = vec!["Закарпатська".to_string()];

    let err = resolve_region_links(&document, &fragments, 4, BASE_URL).unwrap_err();
    assert!(matches!(err, HarvestError::RegionNotFound { .. }));
}

#[test]
fn resolve_region_links_fails_when_the_column_has_no_anchor() {
    let document = Html::parse_document(TOP_PAGE);
    let fragments = vec!["Житомирська".to_string()];

    let err = resolve_region_links(&document, &fragments, 4, BASE_URL).unwrap_err();
    assert!(matches!(err, HarvestError::LinkMissing { column: 4, .. }));
}

#[test]
fn councils_on_page_reads_the_third_table_in_order() {
    let document = Html::parse_document(REGION_PAGE);

    let councils = councils_on_page(&document, "region-url", BASE_URL).unwrap();

    let names: Vec<&str> = councils.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "Вінницька міська рада",
            "Жмеринська міська рада",
            "Козятинська міська рада"
        ]
    );
    assert_eq!(
        councils["Вінницька міська рада"],
        format!("{BASE_URL}pvm056_1.html")
    );
}

#[test]
fn councils_on_page_requires_a_third_table() {
    let document = Html::parse_document("<table><tr><td>one</td></tr></table>");

    let err = councils_on_page(&document, "region-url", BASE_URL).unwrap_err();
    assert!(matches!(err, HarvestError::TableNotFound { .. }));
}

#[test]
fn extract_groups_candidates_under_their_party_headers() {
    let table = extract_council_table(
        COUNCIL_PAGE,
        "council-url",
        "Вінницька область",
        "Вінницька міська рада",
    )
    .unwrap();

    let CouncilTable::Grouped { records, .. } = table else {
        panic!("expected a grouped table");
    };

    assert_eq!(records.len(), 3);
    let rows = records.rows();
    assert_eq!(rows[0][PARTY_COLUMN], "ПОЛІТИЧНА ПАРТІЯ «Сила громад»");
    assert_eq!(rows[1][PARTY_COLUMN], "ПОЛІТИЧНА ПАРТІЯ «Сила громад»");
    // Trailing candidate after the last party header falls back to it.
    assert_eq!(rows[2][PARTY_COLUMN], "ПОЛІТИЧНА ПАРТІЯ «Єдність»");
    assert_eq!(rows[0][REGION_COLUMN], "Вінницька область");
    assert_eq!(rows[0][COUNCIL_COLUMN], "Вінницька міська рада");
    assert_eq!(rows[2]["№ ТВО, за яким закріплено"], "3");
}

#[test]
fn extract_keeps_tables_without_party_rows_flat() {
    let table = extract_council_table(
        FLAT_COUNCIL_PAGE,
        "council-url",
        "Волинська область",
        "Луцька міська рада",
    )
    .unwrap();

    let CouncilTable::Flat { records } = table else {
        panic!("expected a flat table");
    };

    assert_eq!(records.len(), 2);
    assert!(!records.has_column(PARTY_COLUMN));
    assert_eq!(records.rows()[0][REGION_COLUMN], "Волинська область");
    assert_eq!(records.rows()[1][COUNCIL_COLUMN], "Луцька міська рада");
}

#[test]
fn extract_fails_without_a_marker_table() {
    let err = extract_council_table(
        "<table><tr><td>щось інше</td></tr></table>",
        "council-url",
        "r",
        "c",
    )
    .unwrap_err();
    assert!(matches!(err, HarvestError::TableNotFound { .. }));
}

#[test]
fn name_boundaries_are_spaced_and_idempotent() {
    let normalizer = RecordNormalizer::new().unwrap();

    let once = normalizer.space_name_boundaries("ІваненкоПетро");
    assert_eq!(once, "Іваненко Петро");

    let twice = normalizer.space_name_boundaries(&once);
    assert_eq!(twice, once);
}

#[test]
fn normalize_splits_a_dedicated_date_column() {
    let normalizer = RecordNormalizer::new().unwrap();
    let mut records = RecordSet::new();
    records.push(make_record(&[
        ("№", "1"),
        ("Прізвище, ім'я, по батькові", "ІваненкоПетро Іванович"),
        ("Дата народження", "м. Київ, 05.03.1980"),
    ]));

    normalizer.normalize(&mut records).unwrap();

    let row = &records.rows()[0];
    assert_eq!(row[NAME_COLUMN], "Іваненко Петро Іванович");
    assert_eq!(row[BIRTH_DATE_COLUMN], "05.03.1980");
    assert_eq!(row[BIRTHPLACE_COLUMN], "м. Київ");
    assert!(records.find_column("Прізвище").is_none());
}

#[test]
fn normalize_extracts_dates_from_the_particulars_column() {
    let normalizer = RecordNormalizer::new().unwrap();
    let mut records = RecordSet::new();
    records.push(make_record(&[
        ("ПІБ", "Коваль Марія Степанівна"),
        ("Відомості про кандидата", "народилася 12.11.1975 у м. Києві"),
    ]));

    normalizer.normalize(&mut records).unwrap();

    let row = &records.rows()[0];
    assert_eq!(row[BIRTH_DATE_COLUMN], "12.11.1975");
    // The general particulars column survives; no birthplace is derived.
    assert!(records.has_column("Відомості про кандидата"));
    assert!(!records.has_column(BIRTHPLACE_COLUMN));
}

#[test]
fn normalize_fails_when_an_expected_date_is_absent() {
    let normalizer = RecordNormalizer::new().unwrap();
    let mut records = RecordSet::new();
    records.push(make_record(&[("Дата народження", "невідомо")]));

    let err = normalizer.normalize(&mut records).unwrap_err();
    assert!(matches!(err, HarvestError::DateNotFound { .. }));
}

#[test]
fn record_sets_concatenate_with_column_union() {
    let mut first = RecordSet::new();
    first.push(make_record(&[("a", "1"), ("b", "2")]));

    let mut second = RecordSet::new();
    second.push(make_record(&[("b", "3"), ("c", "4")]));

    first.append(second);

    let columns: Vec<&str> = first.columns().collect();
    assert_eq!(columns, ["a", "b", "c"]);
    assert_eq!(first.len(), 2);
    assert!(first.rows()[1].get("a").is_none());
    assert_eq!(first.rows()[1]["c"], "4");
}

fn make_record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect()
}
