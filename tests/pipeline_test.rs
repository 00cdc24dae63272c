use anyhow::Result;
use csv_dashboard::data::chart::{histograms, single_column_chart, ChartData, MAX_BINS};
use csv_dashboard::data::export::{to_csv_bytes, EXPORT_FILE_NAME};
use csv_dashboard::data::filter::{apply_filters, filtered_indices, init_ranges, RangeState};
use csv_dashboard::data::loader::load_csv_bytes;
use csv_dashboard::data::model::{Dataset, Value};
use csv_dashboard::state::AppState;

const PEOPLE: &str = "\
age,city,score,member
10,Oslo,1.5,True
20,Lima,,False
30,Pune,3.25,True
40,Oslo,4.0,False
50,Kobe,0.5,True
";

fn people() -> Result<Dataset> {
    Ok(load_csv_bytes(PEOPLE.as_bytes())?)
}

/// Rows kept by checking every ranged column directly.
fn expected_rows(ds: &Dataset, ranges: &RangeState) -> Vec<usize> {
    (0..ds.len())
        .filter(|&r| {
            ranges.iter().all(|(name, range)| {
                let col = ds.column(name).expect("ranged column exists");
                col.values[r]
                    .as_f64()
                    .is_some_and(|v| range.lo <= v && v <= range.hi)
            })
        })
        .collect()
}

#[test]
fn age_range_keeps_three_rows() -> Result<()> {
    let ds = load_csv_bytes(b"age,city\n10,A\n20,B\n30,C\n40,D\n50,E\n")?;
    let mut ranges = init_ranges(&ds);
    ranges.get_mut("age").unwrap().select(20.0, 40.0);

    let filtered = apply_filters(&ds, &ranges);
    assert_eq!(filtered.len(), 3);
    assert_eq!(
        filtered.column("age").unwrap().values,
        vec![Value::Integer(20), Value::Integer(30), Value::Integer(40)]
    );
    assert_eq!(filtered.column_names(), ds.column_names());
    Ok(())
}

#[test]
fn filter_matches_conjunction_for_many_ranges() -> Result<()> {
    let ds = people()?;
    let base = init_ranges(&ds);
    let bounds = [0.0, 0.5, 1.5, 10.0, 20.0, 25.0, 40.0, 50.0];

    for &a_lo in &bounds {
        for &a_hi in &bounds {
            for &s_hi in &[0.5, 1.5, 3.25, 4.0] {
                let mut ranges = base.clone();
                ranges.get_mut("age").unwrap().select(a_lo, a_hi);
                ranges.get_mut("score").unwrap().select(0.0, s_hi);
                assert_eq!(filtered_indices(&ds, &ranges), expected_rows(&ds, &ranges));
            }
        }
    }
    Ok(())
}

#[test]
fn full_ranges_only_drop_missing_values() -> Result<()> {
    let ds = load_csv_bytes(b"a,b\n1,x\n2,y\n3,z\n")?;
    let ranges = init_ranges(&ds);
    assert_eq!(apply_filters(&ds, &ranges), ds);

    // `score` is missing in the second row.
    let people = people()?;
    let filtered = apply_filters(&people, &init_ranges(&people));
    assert_eq!(filtered.index, vec![0, 2, 3, 4]);
    Ok(())
}

#[test]
fn filtering_is_idempotent() -> Result<()> {
    let ds = people()?;
    let mut ranges = init_ranges(&ds);
    ranges.get_mut("age").unwrap().select(15.0, 45.0);

    let once = apply_filters(&ds, &ranges);
    let twice = apply_filters(&once, &ranges);
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn export_round_trips() -> Result<()> {
    let ds = people()?;
    let mut ranges = init_ranges(&ds);
    ranges.get_mut("age").unwrap().select(10.0, 40.0);
    let filtered = apply_filters(&ds, &ranges);

    let reparsed = load_csv_bytes(&to_csv_bytes(&filtered)?)?;
    assert_eq!(reparsed.len(), filtered.len());
    assert_eq!(reparsed.columns, filtered.columns);
    Ok(())
}

#[test]
fn text_only_dataset_is_not_filtered() -> Result<()> {
    let ds = load_csv_bytes(b"city\nOslo\nLima\n")?;
    let mut state = AppState::default();
    state.set_dataset(ds.clone(), "cities.csv");

    assert!(state.ranges.is_empty());
    assert_eq!(state.filtered, ds);
    Ok(())
}

#[test]
fn chart_kind_follows_column_type() -> Result<()> {
    let ds = people()?;
    assert!(matches!(single_column_chart(&ds, "age"), Some(ChartData::Line(_))));
    assert!(matches!(single_column_chart(&ds, "score"), Some(ChartData::Line(_))));
    assert!(matches!(single_column_chart(&ds, "city"), Some(ChartData::Count(_))));
    assert_eq!(single_column_chart(&ds, "member"), None);
    Ok(())
}

#[test]
fn open_filter_and_download() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("people.csv");
    std::fs::write(&input, PEOPLE)?;

    let mut state = AppState::default();
    state.open_path(&input)?;
    assert_eq!(state.single_column.as_deref(), Some("age"));
    assert_eq!(state.overview.as_ref().unwrap().preview.len(), 5);

    state.set_range("age", 20.0, 40.0);
    let output = dir.path().join(EXPORT_FILE_NAME);
    state.export_to(&output)?;

    let text = std::fs::read_to_string(&output)?;
    assert_eq!(
        text,
        "age,city,score,member\n30,Pune,3.25,True\n40,Oslo,4.0,False\n"
    );
    Ok(())
}

#[test]
fn unparseable_file_is_reported() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("broken.csv");
    std::fs::write(&input, "a,b\n1,2\n3,4,5\n")?;

    let mut state = AppState::default();
    let err = state.open_path(&input).unwrap_err();
    assert!(format!("{err:#}").contains("expected 2 fields in line 3, saw 3"));
    assert!(state.dataset.is_none());
    Ok(())
}

#[test]
fn infinite_and_outlying_values_stay_usable() -> Result<()> {
    let ds = load_csv_bytes(b"x,big\n1,1\n2,2\n3,3\n4,4\ninf,1000000000000000\n")?;
    let ranges = init_ranges(&ds);
    assert_eq!(ranges["x"].max, f64::INFINITY);
    assert_eq!(ranges["big"].max, 1e15);
    assert_eq!(apply_filters(&ds, &ranges), ds);

    let mut state = AppState::default();
    state.set_dataset(ds, "extremes.csv");
    state.toggle_histogram_column("x");
    state.toggle_histogram_column("big");
    assert_eq!(state.histograms.len(), 2);
    for hist in &state.histograms {
        assert!(!hist.bins.is_empty() && hist.bins.len() <= MAX_BINS);
    }
    let x_total: usize = state.histograms[0].bins.iter().map(|b| b.count).sum();
    assert_eq!(x_total, 4);

    state.set_range("x", 1.0, 3.0);
    assert_eq!(state.filtered.len(), 3);
    assert_eq!(state.histograms.len(), 2);
    Ok(())
}
