#![no_main]

use libfuzzer_sys::fuzz_target;
use pyc_retarget::container::retarget;

fuzz_target!(|data: &[u8]| {
    let _ = retarget(data);
});
