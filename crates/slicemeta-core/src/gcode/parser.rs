//! Single-pass G-code metadata parser.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, SliceMetaError};
use crate::models::{ExtractionResult, ScanConfig};

use super::rules::{detect_slicer, DurationExtractor, FieldExtractor, FilamentExtractor};
use super::scanner::{HeaderWindow, LineScanner};

/// Trait for metadata parsing.
pub trait MetadataParser {
    /// Parse metadata from a line stream. Never fails; unmatched fields stay absent.
    fn parse_reader<R: BufRead>(&self, reader: R, source: &str) -> ExtractionResult;

    /// Parse metadata from a file on disk.
    fn parse_file(&self, path: &Path) -> Result<ExtractionResult>;
}

/// G-code metadata parser.
#[derive(Debug, Clone, Default)]
pub struct GcodeParser {
    config: ScanConfig,
}

impl GcodeParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from scan configuration.
    pub fn from_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Set the number of header lines kept for slicer detection.
    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.config.header_lines = lines;
        self
    }

    /// Set the minimum number of lines read before stopping early.
    pub fn with_early_exit_after(mut self, lines: usize) -> Self {
        self.config.early_exit_after = lines;
        self
    }

    /// Enable or disable early exit.
    pub fn with_early_exit(mut self, enabled: bool) -> Self {
        self.config.early_exit = enabled;
        self
    }

    /// Stopping is only safe once the header window is complete, otherwise
    /// slicer detection would see fewer lines than a full scan.
    fn should_stop(&self, builder: &MetadataBuilder, header: &HeaderWindow, lines: usize) -> bool {
        self.config.early_exit
            && builder.is_complete()
            && lines >= self.config.early_exit_after
            && header.is_full()
    }
}

impl MetadataParser for GcodeParser {
    fn parse_reader<R: BufRead>(&self, reader: R, source: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut scanner = LineScanner::new(reader);
        let mut header = HeaderWindow::new(self.config.header_lines);
        let mut builder = MetadataBuilder::new(source);

        while let Some(line) = scanner.next() {
            header.offer(&line);
            builder.observe(&line);

            if self.should_stop(&builder, &header, scanner.lines_read()) {
                debug!("All fields found, stopping after {} lines", scanner.lines_read());
                break;
            }
        }

        let result = builder.finish(&header.blob());

        debug!(
            "Scanned {} lines of {} in {:?}",
            scanner.lines_read(),
            source,
            start.elapsed()
        );

        result
    }

    fn parse_file(&self, path: &Path) -> Result<ExtractionResult> {
        let unavailable = |source: io::Error| SliceMetaError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        if file.metadata().map_err(unavailable)?.is_dir() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::IsADirectory,
                "is a directory",
            )));
        }

        info!("Parsing G-code file: {}", path.display());

        Ok(self.parse_reader(BufReader::new(file), &path.to_string_lossy()))
    }
}

/// Extract metadata from a file with default settings.
pub fn extract(path: impl AsRef<Path>) -> Result<ExtractionResult> {
    GcodeParser::new().parse_file(path.as_ref())
}

/// Partial result filled in as lines are seen. Each field is set at most once.
struct MetadataBuilder {
    result: ExtractionResult,
    length: FilamentExtractor,
    mass: FilamentExtractor,
    duration: DurationExtractor,
}

impl MetadataBuilder {
    fn new(source: &str) -> Self {
        Self {
            result: ExtractionResult::empty(source),
            length: FilamentExtractor::length(),
            mass: FilamentExtractor::mass(),
            duration: DurationExtractor::new(),
        }
    }

    fn observe(&mut self, line: &str) {
        if self.result.filament_length_mm.is_none() {
            if let Some(mm) = self.length.extract(line) {
                debug!("Filament length: {} mm", mm);
                self.result.filament_length_mm = Some(mm);
            }
        }

        if self.result.filament_mass_g.is_none() {
            if let Some(g) = self.mass.extract(line) {
                debug!("Filament mass: {} g", g);
                self.result.filament_mass_g = Some(g);
            }
        }

        if self.result.duration_seconds.is_none() {
            if let Some(found) = self.duration.extract(line) {
                debug!("Print time: {}s ({})", found.seconds, found.form);
                self.result.duration_seconds = Some(found.seconds);
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.result.is_complete()
    }

    fn finish(mut self, header: &str) -> ExtractionResult {
        self.result.slicer_name = detect_slicer(header);
        if let Some(slicer) = self.result.slicer_name {
            debug!("Slicer: {}", slicer);
        }
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slicer;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::io::{Cursor, Read, Write};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn parse(text: &str) -> ExtractionResult {
        GcodeParser::new().parse_reader(Cursor::new(text.to_string()), "test.gcode")
    }

    /// `head` lines, then `filler` motion lines, then `tail` lines.
    fn gcode(head: &[&str], filler: usize, tail: &[&str]) -> String {
        let mut text = String::new();
        for line in head {
            text.push_str(line);
            text.push('\n');
        }
        for i in 0..filler {
            text.push_str(&format!("G1 X{} Y{} E0.05\n", i % 200, i % 150));
        }
        for line in tail {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_cura_end_to_end() {
        let text = gcode(
            &[
                ";FLAVOR:Marlin",
                ";TIME:7200",
                ";Filament used: 1.2345m",
                "; filament used [mm] = 1234.5",
                "; filament used [g] = 36.7",
                ";Generated with Cura_SteamEngine 5.6.0",
            ],
            50,
            &[],
        );

        let result = parse(&text);

        assert_eq!(
            result,
            ExtractionResult {
                filament_length_mm: Some(dec("1234.5")),
                filament_mass_g: Some(dec("36.7")),
                duration_seconds: Some(7200),
                slicer_name: Some(Slicer::Cura),
                source_identifier: "test.gcode".to_string(),
            }
        );
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let mut text = String::from(
            ";TIME:7200\r; filament used [mm] = 1234.5\r; filament used [g] = 36.7\r;Generated with Cura_SteamEngine\r",
        );
        for _ in 0..400 {
            text.push_str("G1 X1 Y1\r");
        }
        // Outside the header window once lines split on `\r`
        text.push_str("; generated by PrusaSlicer 2.7.1\r");

        let result = parse(&text);

        assert_eq!(result.duration_seconds, Some(7200));
        assert_eq!(result.filament_length_mm, Some(dec("1234.5")));
        assert_eq!(result.filament_mass_g, Some(dec("36.7")));
        assert_eq!(result.slicer_name, Some(Slicer::Cura));
    }

    #[test]
    fn test_prusa_style_file() {
        let text = gcode(
            &["; generated by PrusaSlicer 2.7.1+linux-x64-GTK3 on 2024-03-01 at 10:00:00 UTC"],
            400,
            &[
                "; filament used [mm] = 6789.01",
                "; filament used [cm3] = 16.33",
                "; filament used [g] = 20.25",
                "; estimated printing time (normal mode) = 17h 56m",
                "; estimated printing time (silent mode) = 18h 30m",
            ],
        );

        let result = parse(&text);

        assert_eq!(result.filament_length_mm, Some(dec("6789.01")));
        assert_eq!(result.filament_mass_g, Some(dec("20.25")));
        assert_eq!(result.duration_seconds, Some(64560));
        assert_eq!(result.slicer_name, Some(Slicer::PrusaSlicer));
    }

    #[test]
    fn test_filament_value_ignores_case_and_whitespace() {
        let result = parse("   ;   FILAMENT USED   [MM]   =   250.125   \n");

        assert_eq!(result.filament_length_mm, Some(dec("250.125")));
    }

    #[test]
    fn test_first_match_wins() {
        let result = parse(
            "; filament used [g] = 10.5\n\
             ; filament used [g] = 99.9\n\
             ;TIME:100\n\
             ; estimated printing time = 2h\n",
        );

        assert_eq!(result.filament_mass_g, Some(dec("10.5")));
        assert_eq!(result.duration_seconds, Some(100));
    }

    #[test]
    fn test_fields_are_independent() {
        let result = parse("; filament used [mm] = oops\n; printing time: 45m\n");

        assert_eq!(result.filament_length_mm, None);
        assert_eq!(result.filament_mass_g, None);
        assert_eq!(result.duration_seconds, Some(2700));
    }

    #[test]
    fn test_unparseable_duration_is_absent() {
        let result = parse("; printing time: a while\n; estimated printing time = later\n");

        assert_eq!(result.duration_seconds, None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), ExtractionResult::empty("test.gcode"));
    }

    #[test]
    fn test_slicer_outside_header_window_is_ignored() {
        let text = gcode(&[], 300, &["; generated by PrusaSlicer"]);
        assert_eq!(parse(&text).slicer_name, None);

        let text = gcode(&[], 299, &["; generated by PrusaSlicer"]);
        assert_eq!(parse(&text).slicer_name, Some(Slicer::PrusaSlicer));
    }

    #[test]
    fn test_header_window_is_configurable() {
        let text = gcode(&[], 10, &["; OrcaSlicer"]);
        let parser = GcodeParser::new().with_header_lines(5);

        assert_eq!(parser.parse_reader(Cursor::new(text), "x").slicer_name, None);
    }

    #[test]
    fn test_early_exit_matches_full_scan() {
        let early = gcode(
            &[
                "; BambuStudio 01.09",
                "; filament used [mm] = 100",
                "; filament used [g] = 3",
                "; print time: 01:00:00",
            ],
            5000,
            &["; filament used [mm] = 999", ";TIME:1"],
        );
        let late = gcode(
            &["; OrcaSlicer 2.1"],
            5000,
            &["; filament used [mm] = 100", "; filament used [g] = 3", ";TIME:3600"],
        );

        for text in [early, late] {
            let fast = GcodeParser::new().parse_reader(Cursor::new(text.clone()), "x");
            let full = GcodeParser::new()
                .with_early_exit(false)
                .parse_reader(Cursor::new(text), "x");

            assert!(fast.is_complete());
            assert_eq!(fast, full);
        }
    }

    #[test]
    fn test_early_exit_keeps_full_header_window() {
        // Exit threshold passes at line 250, higher priority signature at line 290.
        let text = gcode(
            &[
                "; Cura_SteamEngine",
                ";TIME:60",
                "; filament used [mm] = 1",
                "; filament used [g] = 1",
            ],
            285,
            &["; PrusaSlicer"],
        );

        assert_eq!(parse(&text).slicer_name, Some(Slicer::PrusaSlicer));
    }

    struct PanicReader;

    impl Read for PanicReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            panic!("read past early exit");
        }
    }

    #[test]
    fn test_early_exit_stops_reading() {
        let head = gcode(
            &[
                ";TIME:60",
                "; filament used [mm] = 1",
                "; filament used [g] = 1",
            ],
            320,
            &[],
        );
        let reader = BufReader::new(Cursor::new(head).chain(PanicReader));

        let result = GcodeParser::new().parse_reader(reader, "x");

        assert_eq!(result.duration_seconds, Some(60));
    }

    #[test]
    fn test_parse_file_sets_source_and_decodes_lossily() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"; caf\xe9 \xff\xfe\n; filament used [g] = 12.5\n;TIME:30\n")
            .unwrap();

        let result = extract(file.path()).unwrap();

        assert_eq!(result.filament_mass_g, Some(dec("12.5")));
        assert_eq!(result.duration_seconds, Some(30));
        assert_eq!(result.source_identifier, file.path().to_string_lossy());
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.gcode");

        match extract(&path) {
            Err(SliceMetaError::SourceUnavailable { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            extract(dir.path()),
            Err(SliceMetaError::SourceUnavailable { .. })
        ));
    }
}
