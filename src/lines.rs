//! Tab separated photo lines
//!
//! Input fields: owner, url, timestamp (`yyyyMMddHHmmss`), longitude,
//! latitude, formatted address, address component 1..3, country. Anything
//! after the country is ignored, so annotated dumps can be read back.

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cluster::{AddressComponents, Photo};
use crate::config::{EngineConfig, HomeConfig};
use crate::error::{Error, Result};
use crate::person::Person;

/// Field positions of a photo line
const OWNER: usize = 0;
const URL: usize = 1;
const TIMESTAMP: usize = 2;
const LONGITUDE: usize = 3;
const LATITUDE: usize = 4;
const FORMATTED_ADDRESS: usize = 5;
const ADDRESS_COMPONENTS: usize = 6;
const COUNTRY: usize = 9;

/// Non-empty field at `idx`, if present
fn field<'a>(record: &'a StringRecord, idx: usize) -> Option<&'a str> {
    record.get(idx).filter(|s| !s.is_empty())
}

/// Parses one photo line into its owner and photo
///
/// A bad timestamp fails the line. Bad or half-missing coordinates only drop
/// the coordinate.
pub fn parse_photo_record(record: &StringRecord, line: u64) -> Result<(String, Photo)> {
    let owner = field(record, OWNER).ok_or(Error::MissingField {
        line,
        field: "owner",
    })?;
    let url = record.get(URL).ok_or(Error::MissingField { line, field: "url" })?;
    let timestamp = field(record, TIMESTAMP).ok_or(Error::MissingField {
        line,
        field: "timestamp",
    })?;

    let mut photo = Photo::parse(url, timestamp)?;

    let lon = field(record, LONGITUDE).map(str::parse::<f64>);
    let lat = field(record, LATITUDE).map(str::parse::<f64>);
    if let (Some(Ok(lon)), Some(Ok(lat))) = (lon, lat) {
        photo = photo.with_point(lon, lat);
    }

    photo.formatted_address = field(record, FORMATTED_ADDRESS).map(str::to_string);

    let components: Vec<&str> = (ADDRESS_COMPONENTS..ADDRESS_COMPONENTS + 3)
        .map(|i| record.get(i).unwrap_or(""))
        .collect();
    if components.iter().any(|c| !c.is_empty()) {
        photo.address_components = Some(AddressComponents::new(
            components[0],
            components[1],
            components[2],
        ));
    }

    if let Some(country) = field(record, COUNTRY) {
        photo = photo.with_country(country);
    }

    Ok((owner.to_string(), photo))
}

/// Reads photo lines and groups them into people, sorted by name
///
/// Lines that fail to parse are logged and skipped.
pub fn read_people(path: &Path) -> Result<Vec<Person>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut people: BTreeMap<String, Person> = BTreeMap::new();
    let mut loaded = 0u64;

    for result in reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "skipping unreadable photo line");
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        let record = decode_record(&record, line);

        match parse_photo_record(&record, line) {
            Ok((owner, photo)) => {
                people
                    .entry(owner.clone())
                    .or_insert_with(|| Person::new(&owner))
                    .add_photo(photo);
                loaded += 1;
                if loaded % 1000 == 0 {
                    debug!(loaded, "lines loaded");
                }
            }
            Err(e) => warn!(line, error = %e, "skipping photo line"),
        }
    }

    info!(photos = loaded, people = people.len(), ?path, "input loaded");
    Ok(people.into_values().collect())
}

/// Decodes a raw tab separated line
///
/// Invalid UTF-8 is replaced rather than failing the line, so a garbled
/// coordinate only costs the coordinate.
pub fn decode_record(record: &ByteRecord, line: u64) -> StringRecord {
    StringRecord::from_byte_record(record.clone()).unwrap_or_else(|_| {
        warn!(line, "line is not valid UTF-8, decoding lossily");
        StringRecord::from_byte_record_lossy(record.clone())
    })
}

/// Photo line of `photo` owned by `owner`
pub fn photo_line(owner: &str, photo: &Photo) -> String {
    format!("{}\t{}", owner, photo)
}

/// Writes every photo line of a person, followed by the home flag and local
/// cluster id for clustered photos
pub fn write_photo_dump<W: Write>(writer: &mut W, person: &Person) -> Result<()> {
    for (i, photo) in person.photos().iter().enumerate() {
        write!(writer, "{}", photo_line(person.name(), photo))?;
        if let Some(id) = person.cluster_of(i) {
            let home = if person.is_in_home(i) { 1 } else { 0 };
            write!(writer, "\t{}\t{}", home, id)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the plain text event report of a person
///
/// Candidates are listed newest first; accepted ones are marked with `*` and
/// followed by their presentation segments.
pub fn write_report<W: Write>(
    writer: &mut W,
    person: &Person,
    config: &EngineConfig,
) -> Result<()> {
    let photos = person.photos();
    let home = person.home();

    writeln!(writer, "# {}", person.name())?;
    writeln!(
        writer,
        "photos: {} | geo-tagged: {} | location lookups: {}",
        person.image_count(),
        person.geo_image_count(),
        person.lookup_calls()
    )?;
    if !home.countries.is_empty() {
        writeln!(writer, "home countries: {}", join(&home.countries))?;
    }
    if !home.regions.is_empty() {
        writeln!(writer, "home regions: {}", join(&home.regions))?;
    }

    write_local_clusters(writer, person, &config.home)?;

    for candidate in person.candidates().iter().rev() {
        let accepted = person.is_accepted(candidate);
        let location = candidate
            .representative_location(photos, home)
            .map(|l| l.to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{} [{}] {} {} ({} photos)",
            if accepted { "*" } else { " " },
            candidate.id(),
            candidate.range_label(photos),
            location,
            candidate.group.len()
        )?;

        if !accepted {
            continue;
        }
        for segment in candidate.segments(photos, &config.event) {
            let location = segment
                .representative_location(photos, home)
                .map(|l| l.to_string())
                .unwrap_or_default();
            writeln!(
                writer,
                "    - {} {} ({} photos)",
                segment.range_label(photos),
                location,
                segment.group.len()
            )?;
            for photo in segment.group.photos(photos) {
                writeln!(writer, "        {}", photo.url)?;
            }
        }
    }

    writeln!(writer)?;
    Ok(())
}

fn write_local_clusters<W: Write>(writer: &mut W, person: &Person, config: &HomeConfig) -> Result<()> {
    let photos = person.photos();

    for cluster in person.local_clusters() {
        let flag = if cluster.is_home {
            "home"
        } else if person.is_close_to_home(cluster, config) {
            "near home"
        } else {
            ""
        };
        let center = cluster
            .group
            .centroid(photos)
            .map(|c| format!("{:.5},{:.5}", c.x(), c.y()))
            .unwrap_or_default();

        writeln!(
            writer,
            "  place {} @ {} : {} photos over {} days ({} day span) {}",
            cluster.id(),
            center,
            cluster.group.len(),
            cluster.group.photo_day_count(photos),
            cluster.group.duration_day_count(photos).unwrap_or(0),
            flag
        )?;
    }
    Ok(())
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
