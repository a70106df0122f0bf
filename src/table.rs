//! The seam to the switch's data-plane control API. The listener only
//! sees the [`TableProgrammer`] trait; production wires it to the
//! out-of-process control-plane tool.

use crate::command::{CommandSpec, PdRpc};
use crate::error::RelayError;

/// Fixed priority/action selector installed with every entry.
pub const ACTION_SELECTOR: u8 = 0x80;

pub trait TableProgrammer {
    /// Installs one forwarding entry mapping the queue pair to its
    /// registered memory region.
    fn add_entry(
        &mut self,
        selector: u8,
        queue_pair_id: u32,
        virtual_address: u64,
        remote_key: u32,
    ) -> Result<(), RelayError>;
}

/// Programs the egress table by rendering the bfrt call as an eval
/// snippet and pushing it through [`PdRpc`].
pub struct PdRpcProgrammer {
    rpc: PdRpc,
}

impl PdRpcProgrammer {
    pub fn new(rpc: PdRpc) -> Self {
        Self { rpc }
    }
}

fn add_entry_code(selector: u8, queue_pair_id: u32, virtual_address: u64, remote_key: u32) -> String {
    format!(
        "bfrt.port_copying.pipe.SwitchEgress.set_qp_vr_rk.add_with_set_qp_vr_rk_action({selector:#x}, {queue_pair_id:#x}, {virtual_address:#x}, {remote_key:#x})"
    )
}

impl TableProgrammer for PdRpcProgrammer {
    fn add_entry(
        &mut self,
        selector: u8,
        queue_pair_id: u32,
        virtual_address: u64,
        remote_key: u32,
    ) -> Result<(), RelayError> {
        let code = add_entry_code(selector, queue_pair_id, virtual_address, remote_key);
        self.rpc.run(&CommandSpec::from(code), true)?;
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_the_bfrt_call_in_hex() {
        let code = add_entry_code(ACTION_SELECTOR, 0x5, 0x2A, 0x100);
        assert_eq!(
            code,
            "bfrt.port_copying.pipe.SwitchEgress.set_qp_vr_rk.add_with_set_qp_vr_rk_action(0x80, 0x5, 0x2a, 0x100)"
        );
    }
}
