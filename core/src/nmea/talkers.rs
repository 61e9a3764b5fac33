//! Talker identifiers and sentence formatters from NMEA 0183 v3.01.

pub const TALKER_IDS: &[&str] = &[
    "AG", "AP", "AI", "CD", "CR", "CS", "CT", "CV", "CX", "DE", "DF", "EC", "EI", "EP", "ER",
    "GL", "GN", "GP", "HC", "HE", "HN", "II", "IN", "LC", "P", "RA", "SD", "SN", "SS", "TI",
    "VD", "VM", "VW", "VR", "YX", "ZA", "ZC", "ZQ", "ZV", "WI",
];

pub const SENTENCE_FORMATS: &[&str] = &[
    "AAM", "ABK", "ACA", "ACK", "AIR", "ALM", "ALR", "APB", "BEC", "BOD", "BWC", "BWR", "BWW",
    "CUR", "DBT", "DCN", "DPT", "DSC", "DSE", "DSI", "DSR", "DTM", "FSI", "GBS", "GGA", "GLC",
    "GLL", "GMP", "GNS", "GRS", "GSA", "GST", "GSV", "HDG", "HDT", "HMR", "HMS", "HSC", "HTC",
    "HTD", "LCD", "LRF", "LRI", "LR1", "LR2", "LR3", "MLA", "MSK", "MSS", "MTW", "MWD", "MWV",
    "OSD", "RMA", "RMB", "RMC", "ROT", "RPM", "RSA", "RSD", "RTE", "SFI", "SSD", "STN", "TLB",
    "TLL", "TTM", "TUT", "TXT", "VBW", "VDR", "VHW", "VLW", "VPW", "VSD", "VTG", "WCV", "WNC",
    "WPL", "XDR", "XTE", "XTR", "ZDA", "ZDL", "ZFO", "ZTF", "ABM", "BBM", "VDM", "VDO",
];

pub fn is_known_talker(talker: &str) -> bool {
    TALKER_IDS.contains(&talker)
}

pub fn is_known_format(format: &str) -> bool {
    SENTENCE_FORMATS.contains(&format)
}
