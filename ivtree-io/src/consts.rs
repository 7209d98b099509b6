/// Magic bytes opening every serialized interval forest.
pub const IVT_MAGIC: &[u8; 4] = b"IVTF";

/// Current `.ivt` format version.
pub const IVT_FORMAT_VERSION: u8 = 1;
