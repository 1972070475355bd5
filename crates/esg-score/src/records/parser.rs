use crate::scoring::DisclosureRecord;
use std::io::Read;

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<DisclosureRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<DisclosureRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(strip_bom(reader)?);

    csv_reader
        .deserialize::<DisclosureRecord>()
        .collect::<Result<Vec<_>, _>>()
}

// Spreadsheet exports of the analysis table usually start with a BOM, which
// would otherwise become part of the first header name.
fn strip_bom<R: Read>(mut reader: R) -> Result<std::io::Cursor<Vec<u8>>, csv::Error> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(..3);
    }
    Ok(std::io::Cursor::new(buffer))
}
