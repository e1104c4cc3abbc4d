#[cfg(test)]
mod tests {
    use crate::cluster::{AddressComponents, Photo};
    use crate::config::EngineConfig;
    use crate::lines::{photo_line, read_people, write_photo_dump};
    use crate::lookup::{LocationLookup, LookupTable};
    use crate::person::Person;
    use crate::{EngineArgs, run_events, run_pipeline, run_sample_lookup, write_reports};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 5, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    /// Photo lines of a person with 20 days at home and a two photo trip
    fn alice_lines() -> String {
        let mut lines = Vec::new();
        for day in 0..20 {
            let photo = Photo::new(&format!("home-{}", day), base() + Duration::days(day))
                .with_point(127.0 + day as f64 * 0.0001, 37.5)
                .with_country("South Korea")
                .with_address("Seoul", AddressComponents::new("Seoul", "Jung-gu", ""));
            lines.push(photo_line("alice", &photo));
        }
        let trip = [("tokyo-1", 0, 139.7), ("tokyo-2", 40, 139.71)];
        for (url, hours, lon) in trip {
            let photo = Photo::new(url, base() + Duration::days(30) + Duration::hours(hours))
                .with_point(lon, 35.6)
                .with_country("Japan")
                .with_address("Tokyo", AddressComponents::new("Tokyo", "Minato", ""));
            lines.push(photo_line("alice", &photo));
        }
        lines.join("\n") + "\n"
    }

    fn engine_args(input: &Path) -> EngineArgs {
        EngineArgs {
            input: input.to_path_buf(),
            config: None,
            density: Some(2),
            eps: Some(0.01),
            adaptive_ratio: None,
            segment_interval: None,
        }
    }

    fn cleanup(paths: &[&PathBuf]) {
        for path in paths {
            let _ = fs::remove_file(path);
        }
    }

    #[test]
    fn test_read_people_skips_bad_lines() {
        let input = "bob\tb-2\t20140503120000\t127.1\t37.5\t\t\t\t\t
alice\ta-2\t20140504090000\t\t\t\t\t\t\t
alice\ta-bad\t2014-05-04\t127.0\t37.5\t\t\t\t\t
alice\ta-1\t20140503090000\t127.0\t37.5\tSeoul\tSeoul\tJung-gu\t\tSouth Korea
\tnobody\t20140503090000
";
        let test_file = PathBuf::from("test_read_people_rust.tsv");
        fs::write(&test_file, input).expect("Failed to create test TSV");

        let people = read_people(&test_file).expect("Failed to read TSV");
        cleanup(&[&test_file]);

        assert_eq!(people.len(), 2);
        assert_eq!(people[0].name(), "alice");
        assert_eq!(people[1].name(), "bob");

        let alice = &people[0];
        assert_eq!(alice.image_count(), 2);
        assert_eq!(alice.geo_image_count(), 1);
        assert_eq!(alice.photos()[0].url, "a-1");
        assert_eq!(alice.photos()[0].country.as_deref(), Some("South Korea"));
        assert_eq!(alice.photos()[1].url, "a-2");
    }

    #[test]
    fn test_invalid_utf8_only_costs_the_field() {
        let mut input = Vec::new();
        input.extend_from_slice(b"alice\ta-1\t20140503090000\t127.0\t37.5\t\t\t\t\tSouth Korea\n");
        input.extend_from_slice(b"alice\ta-2\t20140503100000\t\xff\xfe\t37.5\t\t\t\t\tSouth Korea\n");
        input.extend_from_slice(b"bob\tb-1\t20140503110000\t129.0\t35.1\t\t\t\t\t\n");
        let test_file = PathBuf::from("test_invalid_utf8_rust.tsv");
        fs::write(&test_file, &input).expect("Failed to create test TSV");

        let people = read_people(&test_file);
        cleanup(&[&test_file]);

        let people = people.expect("one garbled field must not fail the batch");
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].image_count(), 2);
        assert_eq!(people[0].geo_image_count(), 1);
        let garbled = &people[0].photos()[1];
        assert_eq!(garbled.url, "a-2");
        assert!(garbled.point.is_none());
        assert_eq!(garbled.country.as_deref(), Some("South Korea"));
        assert_eq!(people[1].name(), "bob");
        assert_eq!(people[1].geo_image_count(), 1);
    }

    #[test]
    fn test_lookup_table_skips_garbled_lines() {
        let mut input = Vec::new();
        input.extend_from_slice(b"\xff\xfe\t37.5\tSeoul\tJung-gu\tSouth Korea\n");
        input.extend_from_slice(b"127.0\t37.5\tSeoul\tJung-gu\tSouth Korea\n");
        input.extend_from_slice(b"129.0\t35.1\tBusan\n");
        let test_file = PathBuf::from("test_lookup_garbled_rust.tsv");
        fs::write(&test_file, &input).expect("Failed to create lookup file");

        let table = LookupTable::read(&test_file);
        cleanup(&[&test_file]);

        let table = table.expect("garbled lines are skipped");
        assert_eq!(table.len(), 1);
        let location = table
            .lookup(&crate::cluster::GeoPoint::new(127.0, 37.5))
            .expect("valid line loaded");
        assert_eq!(location.country, "South Korea");
    }

    #[test]
    fn test_engine_args_overrides() {
        let mut args = engine_args(Path::new("unused.tsv"));
        let config = args.engine_config().expect("defaults");
        assert_eq!(config.clustering.density_threshold, 2);
        assert_eq!(config.clustering.distance_threshold, Some(0.01));
        assert_eq!(config.event.segment_interval_secs, Some(3600));

        args.eps = Some(0.0);
        args.segment_interval = Some(0);
        let config = args.engine_config().expect("defaults");
        assert_eq!(config.clustering.distance_threshold, None);
        assert_eq!(config.event.segment_interval_secs, None);
    }

    #[test]
    fn test_engine_config_file() {
        let test_file = PathBuf::from("test_engine_config_rust.json");
        fs::write(
            &test_file,
            r#"{"clustering": {"density_threshold": 4}, "home": {"proximity_radius": 0.5}}"#,
        )
        .expect("Failed to create config");

        let mut args = engine_args(Path::new("unused.tsv"));
        args.config = Some(test_file.clone());
        args.density = None;
        let config = args.engine_config();
        cleanup(&[&test_file]);

        let config = config.expect("valid config");
        assert_eq!(config.clustering.density_threshold, 4);
        // Command line wins over the file
        assert_eq!(config.clustering.distance_threshold, Some(0.01));
        assert_eq!(config.home.proximity_radius, 0.5);
        assert_eq!(config.home.min_clusters_for_statistics, 5);
    }

    #[test]
    fn test_main_program() {
        let test_file = PathBuf::from("test_main_program_rust.tsv");
        fs::write(&test_file, alice_lines()).expect("Failed to create test TSV");

        let mut people = read_people(&test_file).expect("Failed to read TSV");
        let config = engine_args(&test_file).engine_config().expect("config");
        run_pipeline(&mut people, &config, None);

        let mut report = Vec::new();
        write_reports(&mut report, &people, &config).expect("report");
        let report = String::from_utf8(report).expect("utf8");

        assert!(report.contains("# alice"));
        assert!(report.contains("photos: 22 | geo-tagged: 22 | location lookups: 0"));
        assert!(report.contains("home countries: South Korea"));
        assert!(report.contains("home regions: Seoul"));
        assert!(report.contains("20 photos over 20 days (20 day span) home"));
        assert!(report.contains("* [21] on 2014/06/02 at Japan (1 photos)"));
        assert!(report.contains("* [22] on 2014/06/04 at Japan (1 photos)"));
        assert!(report.contains("  [1] on 2014/05/03 at Seoul Jung-gu (1 photos)"));
        assert!(report.contains("        tokyo-1"));
        // Newest first
        assert!(report.find("[22]") < report.find("[21]"));

        // The annotated dump reads back as the same photos
        let dump_file = PathBuf::from("test_main_program_dump_rust.tsv");
        let mut dump = Vec::new();
        write_photo_dump(&mut dump, &people[0]).expect("dump");
        let dump = String::from_utf8(dump).expect("utf8");
        assert!(dump.lines().next().unwrap().ends_with("\tSouth Korea\t1\t1"));
        assert!(dump.lines().last().unwrap().ends_with("\tJapan"));

        fs::write(&dump_file, &dump).expect("Failed to write dump");
        let again = read_people(&dump_file).expect("Failed to read dump");
        cleanup(&[&test_file, &dump_file]);

        assert_eq!(again.len(), 1);
        assert_eq!(again[0].photos(), people[0].photos());
    }

    #[test]
    fn test_sample_lookup_then_events() {
        let test_file = PathBuf::from("test_sample_lookup_rust.tsv");
        let lookup_file = PathBuf::from("test_sample_lookup_rust.lookup");
        let report_file = PathBuf::from("test_sample_lookup_rust.report");
        fs::write(&test_file, alice_lines()).expect("Failed to create test TSV");

        let args = engine_args(&test_file);
        run_sample_lookup(&args, &lookup_file).expect("sample lookup");
        let table = LookupTable::read(&lookup_file).expect("lookup table");
        assert_eq!(table.len(), 1);

        let people = read_people(&test_file).expect("Failed to read TSV");
        let center = people[0]
            .photos()
            .iter()
            .find_map(|p| p.point.filter(|pt| table.lookup(pt).is_some()))
            .expect("a photo keyed in the table");
        let location = table.lookup(&center).unwrap();
        assert_eq!(location.first, "Seoul");
        assert_eq!(location.second, "Jung-gu");
        assert_eq!(location.country, "South Korea");

        run_events(
            &args,
            Some(lookup_file.as_path()),
            Some(report_file.as_path()),
            None,
        ).expect("events");
        let report = fs::read_to_string(&report_file).expect("report written");
        cleanup(&[&test_file, &lookup_file, &report_file]);

        assert!(report.contains("location lookups: 1"));
        assert!(report.contains("home countries: South Korea"));
        // Trip photos lost their country to the lookup and are no longer abroad
        assert!(!report.contains("* ["));
    }

    #[test]
    fn test_missing_input_fails() {
        let args = engine_args(Path::new("does_not_exist_rust.tsv"));
        assert!(run_events(&args, None, None, None).is_err());

        let people = read_people(Path::new("does_not_exist_rust.tsv"));
        assert!(people.is_err());

        let config = EngineConfig::default();
        let mut none: Vec<Person> = Vec::new();
        run_pipeline(&mut none, &config, None::<&(dyn LocationLookup + Sync)>);
        assert!(none.is_empty());
    }
}
