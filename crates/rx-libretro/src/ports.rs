//! Controller port bookkeeping

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rx_core::input::device;
use rx_core::ControllerDescription;

/// Controller descriptions announced per port, and the device chosen for
/// each port once a game is running
pub struct ControllerPorts {
    declared: Mutex<Vec<Vec<ControllerDescription>>>,
    selection: OnceCell<Vec<u32>>,
    preferred: Vec<u32>,
}

impl ControllerPorts {
    pub fn new(preferred_device: Option<u32>) -> Self {
        let mut preferred = Vec::with_capacity(3);
        preferred.extend(preferred_device);
        preferred.extend([device::ANALOG, device::JOYPAD]);
        Self {
            declared: Mutex::new(Vec::new()),
            selection: OnceCell::new(),
            preferred,
        }
    }

    /// Append the ports from one controller declaration
    pub fn declare(&self, ports: Vec<Vec<ControllerDescription>>) {
        let mut declared = self.declared.lock();
        declared.extend(ports);
        tracing::debug!("Core declared controllers for {} ports", declared.len());
    }

    pub fn declared(&self) -> Vec<Vec<ControllerDescription>> {
        self.declared.lock().clone()
    }

    /// Device per port, computed on first use and fixed afterwards
    pub fn selection(&self) -> &[u32] {
        self.selection.get_or_init(|| {
            let declared = self.declared.lock();
            declared.iter().map(|port| self.pick(port)).collect()
        })
    }

    fn pick(&self, port: &[ControllerDescription]) -> u32 {
        let Some(first) = port.first() else {
            return device::NONE;
        };
        self.preferred
            .iter()
            .copied()
            .find(|id| port.iter().any(|description| description.id == *id))
            .unwrap_or(first.id)
    }
}
