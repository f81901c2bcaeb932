use luminar::memory::MemoryManager;

#[test]
fn allocating_in_a_pushed_region_frees_on_pop() {
    let mut manager = MemoryManager::new();
    let before = manager.stats().current_bytes;
    manager.push_region();
    let handle = manager.allocate(123i64);
    assert_eq!(*handle.get(), 123);
    assert!(manager.stats().current_bytes > before);
    manager.pop_region();
    assert_eq!(manager.stats().current_bytes, before);
}

#[test]
fn peak_bytes_does_not_shrink_after_a_pop() {
    let mut manager = MemoryManager::new();
    manager.push_region();
    manager.allocate([0u8; 256]);
    let peak = manager.stats().peak_bytes;
    manager.pop_region();
    assert_eq!(manager.stats().peak_bytes, peak);
}

#[test]
fn nested_regions_unwind_like_a_call_stack() {
    let mut manager = MemoryManager::new();
    manager.push_region();
    manager.allocate(1i32);
    manager.push_region();
    manager.allocate(2i32);
    manager.pop_region();
    assert!(manager.stats().current_bytes > 0);
    manager.pop_region();
    assert_eq!(manager.stats().current_bytes, 0);
}

#[test]
fn leak_report_names_an_unclosed_region() {
    let mut manager = MemoryManager::new();
    manager.push_region();
    let report = manager.leak_report();
    assert!(report.contains('1'));
}
