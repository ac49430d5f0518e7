#![no_main]

use libfuzzer_sys::fuzz_target;
use pyc_retarget::opcode;
use pyc_retarget::retarget::retarget_code;

fuzz_target!(|data: &[u8]| {
    let split = data.len() / 2;
    let (code, lnotab) = data.split_at(split);
    let _ = retarget_code(code, lnotab, 1, opcode::opcode_map(), opcode::expansion_for);
});
