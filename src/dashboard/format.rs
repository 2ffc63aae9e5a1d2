use crate::core::domain::model::inventory::InventoryNode;

/// Formats a size given in MiB, e.g. `4096` → `4 GB`.
pub fn format_memory_mb(memory_mb: u64) -> String {
    if memory_mb >= 1024 && memory_mb % 1024 == 0 {
        format!("{} GB", memory_mb / 1024)
    } else if memory_mb >= 1024 {
        format!("{:.1} GB", memory_mb as f64 / 1024.0)
    } else {
        format!("{} MB", memory_mb)
    }
}

/// `(label, value)` lines of the selected-VM panel.
pub fn vm_details(vm: &InventoryNode) -> Vec<(&'static str, String)> {
    let na = || "N/A".to_string();
    vec![
        ("Name", vm.name.clone()),
        ("Folder", vm.folder_display().to_string()),
        ("CPU", vm.cpu.map(|c| c.to_string()).unwrap_or_else(na)),
        ("Memory", vm.memory_mb.map(format_memory_mb).unwrap_or_else(na)),
        (
            "Disk",
            vm.disk_size_gb
                .map(|d| format!("{} GB", d))
                .unwrap_or_else(na),
        ),
        ("Networks", {
            let networks = vm.distinct_networks();
            if networks.is_empty() {
                na()
            } else {
                networks.join(", ")
            }
        }),
    ]
}
