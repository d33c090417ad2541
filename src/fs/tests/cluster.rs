//! Testes para o alocador de clusters

#![cfg(test)]

use crate::fs::fat::layout::{cluster_block, MAX_DATA_CLUSTERS};
use crate::fs::fat::{ClusterAllocator, DirEntry, DirectoryTable};

#[test]
fn test_allocate_lowest_first() {
    let mut clusters = ClusterAllocator::new();
    assert_eq!(clusters.allocate(), Some(1));
    assert_eq!(clusters.allocate(), Some(2));
    assert_eq!(clusters.allocate(), Some(3));

    clusters.free(2);
    assert!(!clusters.is_used(2));
    assert_eq!(clusters.allocate(), Some(2));
    assert_eq!(clusters.allocate(), Some(4));
}

#[test]
fn test_cluster_zero_and_out_of_range() {
    let mut clusters = ClusterAllocator::new();
    assert!(clusters.is_used(0));
    assert!(clusters.is_used(MAX_DATA_CLUSTERS as u16 + 1));

    clusters.free(0);
    clusters.free(9999);
    assert_eq!(clusters.free_count(), MAX_DATA_CLUSTERS);
}

#[test]
fn test_exhaustion() {
    let mut clusters = ClusterAllocator::new();
    for expected in 1..=MAX_DATA_CLUSTERS as u16 {
        assert_eq!(clusters.allocate(), Some(expected));
    }
    assert_eq!(clusters.allocate(), None);
    assert_eq!(clusters.free_count(), 0);

    clusters.free(MAX_DATA_CLUSTERS as u16);
    assert_eq!(clusters.allocate(), Some(MAX_DATA_CLUSTERS as u16));
}

#[test]
fn test_last_cluster_fits_ramdisk() {
    assert_eq!(cluster_block(1), 5);
    assert_eq!(cluster_block(MAX_DATA_CLUSTERS as u16), 504);
}

#[test]
fn test_rebuild_from_directory() {
    let mut table = DirectoryTable::empty();
    *table.get_mut(0).unwrap() = DirEntry {
        name: *b"LIVE    ",
        start_cluster: 7,
        ..DirEntry::EMPTY
    };
    *table.get_mut(1).unwrap() = DirEntry {
        name: *b"GONE    ",
        start_cluster: 9,
        ..DirEntry::EMPTY
    };
    table.tombstone(1);

    let mut clusters = ClusterAllocator::new();
    clusters.allocate();
    clusters.rebuild(&table);

    assert!(clusters.is_used(7));
    assert!(!clusters.is_used(9));
    assert!(!clusters.is_used(1));
    assert_eq!(clusters.free_count(), MAX_DATA_CLUSTERS - 1);
}
