//! Compiled-in rule plugins. A plugin is a function that contributes piece
//! definitions to an engine instance's registry; plugins are activated by
//! name at load time and never afterwards.

pub mod compound;
pub mod falconhunter;
pub mod fundamental;
pub mod omega;
pub mod orthodox;
pub mod shogi;

/// Activates the named plugin on `registry`. Returns `false` if no such
/// plugin exists. Activating a plugin twice is a no-op.
pub fn install(name: &str, registry: &mut crate::registry::PieceRegistry) -> bool {
    if registry.plugin_installed(name) {
        return true;
    }
    match name {
        "orthodox" => orthodox::install(registry),
        "fundamental" => fundamental::install(registry),
        "compound" => compound::install(registry),
        "shogi" => shogi::install(registry),
        "falconhunter" => falconhunter::install(registry),
        "omega" => omega::install(registry),
        _ => return false,
    }
    registry.mark_plugin_installed(name);
    info!("activated plugin \"{}\"", name);
    true
}
