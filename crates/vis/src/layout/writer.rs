use std::fmt::Display;
use std::io::Seek;
use std::io::Write;
use std::marker::PhantomData;

use crate::chart::SeriesNames;

/// Writes a series as a JavaScript file of two arrays.
///
/// The arrays are declared with their length in the first line of the file,
/// which is only known once every point is written. [`SeriesWriter::start`]
/// reserves that line with spaces and [`SeriesWriter::end`] rewinds the
/// writer and fills it in.
pub struct SeriesWriter<W, X, Y> {
    writer: W,
    index: usize,
    names: SeriesNames,
    xtype: PhantomData<X>,
    ytype: PhantomData<Y>,
}

impl<W: Write + Seek, X: Display, Y: Display> SeriesWriter<W, X, Y> {
    pub fn new(writer: W, names: SeriesNames) -> Self {
        Self {
            writer,
            index: 0,
            names,
            xtype: PhantomData,
            ytype: PhantomData,
        }
    }

    pub fn start(&mut self) -> Result<(), std::io::Error> {
        let reserved_bytes = self.header(usize::MAX).len();
        let whitespaces = b" ".repeat(reserved_bytes);

        self.writer.write_all(&whitespaces)?;
        self.writer.write_all(b"\n")
    }

    pub fn write(&mut self, x: X, y: Y) -> Result<(), std::io::Error> {
        let line = format!(
            "{xs}[{idx}] = {x}; {ys}[{idx}] = {y};\n",
            xs = self.names.xs,
            ys = self.names.ys,
            idx = self.index,
        );

        self.writer.write_all(line.as_bytes())?;
        self.index += 1;

        Ok(())
    }

    pub fn end(mut self) -> Result<(), std::io::Error> {
        self.writer.rewind()?;

        let header = self.header(self.index);
        self.writer.write_all(header.as_bytes())?;
        self.writer.flush()
    }

    fn header(&self, size: usize) -> String {
        format!(
            "var {xs} = new Array({size}), {ys} = new Array({size});",
            xs = self.names.xs,
            ys = self.names.ys,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::chart::JsNumber;
    use crate::chart::X;

    fn names() -> SeriesNames {
        SeriesNames { xs: String::from("xs"), ys: String::from("ys") }
    }

    #[test]
    fn write_series_data() -> Result<(), Box<dyn std::error::Error>> {
        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        let mut series = SeriesWriter::new(&mut writer, names());

        let points = [
            (X::from("DE"), JsNumber(Some(500.0))),
            (X::from("FR"), JsNumber(None)),
            (X::from("PL"), JsNumber(Some(12.5))),
        ];

        series.start()?;
        for (x, y) in points {
            series.write(x, y)?;
        }
        series.end()?;

        let content = String::from_utf8(writer.into_inner())?;
        let mut lines = content.lines();

        let header = lines.next().ok_or("missing header")?;
        assert_eq!(header.trim_end(), "var xs = new Array(3), ys = new Array(3);");
        assert_eq!(
            lines.collect::<Vec<_>>(),
            vec![
                "xs[0] = \"DE\"; ys[0] = 500;",
                "xs[1] = \"FR\"; ys[1] = null;",
                "xs[2] = \"PL\"; ys[2] = 12.5;",
            ]
        );

        Ok(())
    }

    #[test]
    fn empty_series_declares_empty_arrays() -> Result<(), Box<dyn std::error::Error>> {
        let mut writer: Cursor<Vec<u8>> = Cursor::new(Vec::new());
        let mut series: SeriesWriter<_, X, JsNumber> = SeriesWriter::new(&mut writer, names());

        series.start()?;
        series.end()?;

        let content = String::from_utf8(writer.into_inner())?;

        assert_eq!(content.trim_end(), "var xs = new Array(0), ys = new Array(0);");

        Ok(())
    }
}
