//! The fixed `torrent-get` field set requested on every full update cycle
//! (spec.md §6) — unchanged from the source regardless of which fields the
//! entity model actually stores, since the daemon's reply shape has to be
//! requested exactly to keep the mirror honest.

pub const TORRENT_GET_FIELDS: &[&str] = &[
    "activityDate",
    "addedDate",
    "bandwidthPriority",
    "comment",
    "creator",
    "dateCreated",
    "doneDate",
    "downloadDir",
    "downloadedEver",
    "downloadLimit",
    "downloadLimited",
    "error",
    "errorString",
    "eta",
    "hashString",
    "haveValid",
    "honorsSessionLimits",
    "id",
    "leftUntilDone",
    "metadataPercentComplete",
    "name",
    "peer-limit",
    "peersConnected",
    "peersGettingFromUs",
    "peersSendingToUs",
    "percentDone",
    "queuePosition",
    "rateDownload",
    "rateUpload",
    "recheckProgress",
    "seedIdleLimit",
    "seedIdleMode",
    "seedRatioLimit",
    "seedRatioMode",
    "sizeWhenDone",
    "status",
    "totalSize",
    "trackerStats",
    "uploadedEver",
    "uploadLimit",
    "uploadLimited",
    "uploadRatio",
];

/// Fields requested for the files sub-fetch (spec.md §4.2, §4.4).
pub const TORRENT_FILES_FIELDS: &[&str] = &["id", "files", "fileStats"];

/// Fields requested for the peers sub-fetch.
pub const TORRENT_PEERS_FIELDS: &[&str] = &["id", "peers"];

/// Fields requested for the single-file check (spec.md §4.4
/// "checkSingleFile"): a torrent with one `priorities` entry has one file.
pub const TORRENT_SINGLE_FILE_FIELDS: &[&str] = &["id", "priorities"];
