//! 表结构和统计信息的文本输出

use crate::map::{directory::Directory, extendible_cuckoo::TableStats, ExtendibleCuckooTable};
use crate::types::DirectoryId;
use std::fmt;

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id())?;
        writeln!(f, "  table:               buckets:")?;
        writeln!(f, "  address | bucketid   bucketid [key]")?;

        for (address, bucket) in self.slots() {
            write!(f, "{:9} | {:<9} ", address, bucket.id())?;

            // 只在桶的最小地址上打印桶内容
            if bucket.id() == address {
                write!(f, "{:9} [", bucket.id())?;
                for position in 0..bucket.capacity() {
                    match bucket.keys().get(position) {
                        Some(key) => write!(f, " {}", key)?,
                        None => f.write_str(" -")?,
                    }
                }
                f.write_str(" ]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExtendibleCuckooTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table ---")?;
        for id in [DirectoryId::First, DirectoryId::Second] {
            write!(f, "{}", self.directory(id))?;
        }
        writeln!(f, "--- end table ---")
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- table stats ---")?;
        writeln!(f, "current tab 1 size: {}", self.directory1_size)?;
        writeln!(f, "current tab 2 size: {}", self.directory2_size)?;
        writeln!(f, "    number of keys: {}", self.total_keys)?;
        writeln!(f, " number of buckets: {}", self.total_buckets)?;
        writeln!(f, "    CPU time spent: {:.6} sec", self.total_time.as_secs_f64())?;
        writeln!(f, "--- end stats ---")
    }
}
