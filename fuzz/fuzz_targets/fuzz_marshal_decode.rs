#![no_main]

use libfuzzer_sys::fuzz_target;
use pyc_retarget::marshal;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result, only that it doesn't panic.
    let _ = marshal::decode(data);
});
