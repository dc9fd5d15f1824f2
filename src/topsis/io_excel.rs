use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::topsis::*;

/// Reads a worksheet of an Excel file. The first row is the header.
///
/// Numbers are written back as text so that the table looks the same as
/// one read from a CSV file.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> CliResult<Dataset> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header_cells = iter.next().context(EmptyTableSnafu { path })?;
    let header: Vec<String> = read_cells(header_cells, 1)?;
    debug!("read_excel_table: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let cells = read_cells(row, lineno)?;
        debug!("read_excel_table: lineno: {:?} row: {:?}", lineno, cells);
        rows.push(cells);
    }
    drop_trailing_blank_rows(&mut rows);
    Ok(Dataset::new(header, rows))
}

// Fully blank lines at the bottom of a sheet are common. Blank lines between
// data rows are kept: the engine reports them.
fn drop_trailing_blank_rows(rows: &mut Vec<Vec<String>>) {
    while let Some(last) = rows.last() {
        if !last.iter().all(|c| c.is_empty()) {
            break;
        }
        debug!("read_excel_table: dropping blank row {:?}", rows.len() + 1);
        rows.pop();
    }
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> CliResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyTableSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

fn read_cells(row: &[DataType], lineno: usize) -> CliResult<Vec<String>> {
    let mut res: Vec<String> = Vec::new();
    for cell in row {
        let s = match cell {
            DataType::String(s) => s.clone(),
            DataType::Float(f) => f.to_string(),
            DataType::Int(i) => i.to_string(),
            DataType::Bool(b) => b.to_string(),
            DataType::Empty => "".to_string(),
            _ => {
                return ExcelWrongCellTypeSnafu {
                    lineno,
                    content: format!("{:?}", cell),
                }
                .fail();
            }
        };
        res.push(s);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptops() -> String {
        format!(
            "{}/tests/data/excel_laptops/excel_laptops_input.xlsx",
            env!("CARGO_MANIFEST_DIR")
        )
    }

    #[test]
    fn reads_first_sheet() {
        let t = read_excel_table(&laptops(), None).unwrap();
        assert_eq!(t.header, vec!["Laptop", "Price", "Battery", "Weight"]);
        assert_eq!(t.rows.len(), 4);
        assert_eq!(t.rows[0], vec!["L1", "1200", "10", "1.4"]);
    }

    #[test]
    fn named_sheet() {
        let t = read_excel_table(&laptops(), Some("Laptops")).unwrap();
        assert_eq!(t.rows.len(), 4);
        assert!(matches!(
            read_excel_table(&laptops(), Some("Nope")),
            Err(TopsisCliError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn not_an_excel_file() {
        let p = format!(
            "{}/tests/data/mobile_phones/mobile_phones_input.csv",
            env!("CARGO_MANIFEST_DIR")
        );
        assert!(matches!(
            read_excel_table(&p, None),
            Err(TopsisCliError::OpeningExcel { .. })
        ));
    }

    #[test]
    fn cells_as_text() {
        let row = vec![
            DataType::String("a".to_string()),
            DataType::Float(2.5),
            DataType::Int(3),
            DataType::Empty,
        ];
        assert_eq!(read_cells(&row, 2).unwrap(), vec!["a", "2.5", "3", ""]);
    }

    #[test]
    fn only_trailing_blank_rows_are_dropped() {
        let row = |cells: &[&str]| -> Vec<String> { cells.iter().map(|s| s.to_string()).collect() };
        let mut rows = vec![
            row(&["A", "1", "2"]),
            row(&["", "", ""]),
            row(&["B", "3", "4"]),
            row(&["", "", ""]),
            row(&["", "", ""]),
        ];
        drop_trailing_blank_rows(&mut rows);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], row(&["", "", ""]));

        // The blank row in the middle is not a number.
        let d = Dataset::new(row(&["id", "a", "b"]), rows);
        assert!(matches!(
            topsis_core::compute(&d, "1,1", "+,+"),
            Err(TopsisError::Parse { .. })
        ));

        let mut blank = vec![row(&["", ""])];
        drop_trailing_blank_rows(&mut blank);
        assert!(blank.is_empty());
    }
}
