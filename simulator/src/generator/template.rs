use navcore::nmea::checksum_hex;

/// Frames a sentence body as `$<body>*<hh>`.
pub fn with_checksum(body: &str) -> String {
    format!("${}*{}", body, checksum_hex(body))
}

/// Latitude as `ddmm.mmmm` plus hemisphere letter.
pub fn latitude_field(latitude: f64) -> (String, &'static str) {
    let hemisphere = if latitude >= 0.0 { "N" } else { "S" };
    (degrees_minutes(latitude.abs(), 2), hemisphere)
}

/// Longitude as `dddmm.mmmm` plus hemisphere letter.
pub fn longitude_field(longitude: f64) -> (String, &'static str) {
    let hemisphere = if longitude >= 0.0 { "E" } else { "W" };
    (degrees_minutes(longitude.abs(), 3), hemisphere)
}

fn degrees_minutes(value: f64, degree_width: usize) -> String {
    let degrees = value.trunc();
    let minutes = (value - degrees) * 60.0;
    format!(
        "{:0width$}{:07.4}",
        degrees as u32,
        minutes,
        width = degree_width
    )
}
