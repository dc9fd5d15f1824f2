// Primitives for reading and writing CSV files.

use std::io::Write;

use crate::topsis::*;

/// Reads a CSV file whose first row is the header.
///
/// Rows of a different length than the header are kept as they are: the
/// scoring step reports them with their position.
pub fn read_csv_table(path: &str) -> CliResult<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);
    ensure!(!header.is_empty(), EmptyTableSnafu { path });

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let row: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, row);
        rows.push(row);
    }
    Ok(Dataset::new(header, rows))
}

pub fn write_table<W: Write>(w: W, table: &Dataset) -> CliResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(w);
    wtr.write_record(&table.header).context(WritingCsvSnafu {})?;
    for row in table.rows.iter() {
        wtr.write_record(row).context(WritingCsvSnafu {})?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(WritingCsvSnafu {})?;
    Ok(())
}

pub fn table_to_string(table: &Dataset) -> CliResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_table(&mut buf, table)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let p = dir.path().join(name);
        fs::write(&p, content).unwrap();
        p.display().to_string()
    }

    #[test]
    fn reads_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_file(
            &dir,
            "in.csv",
            "Model,P1,P2\nA,1,8\n\"B, the second\",2,6\n",
        );
        let t = read_csv_table(&p).unwrap();
        assert_eq!(t.header, vec!["Model", "P1", "P2"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["B, the second", "2", "6"]);
    }

    #[test]
    fn ragged_rows_reach_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let p = write_file(&dir, "in.csv", "id,a,b\nx,1,2\ny,3\n");
        let t = read_csv_table(&p).unwrap();
        assert_eq!(t.rows[1].len(), 2);
        assert!(matches!(
            topsis_core::compute(&t, "1,1", "+,+"),
            Err(TopsisError::Schema { .. })
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_table("/nonexistent/dir/in.csv"),
            Err(TopsisCliError::OpeningCsv { .. })
        ));
    }

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let table = Dataset::new(
            vec!["id".to_string(), "Score".to_string()],
            vec![
                vec!["with \"quotes\"".to_string(), "0.25".to_string()],
                vec!["plain".to_string(), "1".to_string()],
            ],
        );
        let txt = table_to_string(&table).unwrap();
        assert!(txt.starts_with("id,Score\n"), "{}", txt);
        let p = write_file(&dir, "out.csv", &txt);
        assert_eq!(read_csv_table(&p).unwrap(), table);
    }
}
