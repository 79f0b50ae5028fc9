use lccc_siphash::siphash::sys::SipHashState;

/// Seed generator for [`RandomState`](crate::hasher::RandomState).
///
/// Not a general purpose RNG: it only needs to make hash keys unpredictable between processes.
#[derive(Clone, Debug)]
pub struct Rand(SipHashState);

impl Rand {
    pub fn init() -> Self {
        let [k0, k1] = os_keys().unwrap_or_else(fallback_keys);

        Self::from_keys(k0, k1)
    }

    pub fn from_keys(k0: u64, k1: u64) -> Self {
        Self(SipHashState::from_keys(k0, k1))
    }

    pub fn gen(&mut self) -> u64 {
        self.0.update_before_rounds(0x123456789ABCDEF);
        self.0.round();
        self.0.round();
        self.0.update_after_rounds(0x123456789ABCDEF);
        let mut state = self.0;
        state.update_before_final();
        state.finish()
    }
}

#[allow(unused_parens, unused_mut)] // Removing the parens changes how the macro is parsed
fn os_keys() -> Option<[u64; 2]> {
    let mut keys = [0u64; 2];
    let filled;

    cfg_match::cfg_match! {
        target_os = "linux" => ({
            let len = unsafe { libc::getrandom(keys.as_mut_ptr().cast(), 16, 0) };
            filled = len == 16;
        }),
        all(unix, not(target_os = "linux")) => ({
            use std::io::Read;

            // SAFETY: `keys` is 16 bytes of plain integers, valid for any bit pattern
            let bytes =
                unsafe { std::slice::from_raw_parts_mut(keys.as_mut_ptr().cast::<u8>(), 16) };
            filled = std::fs::File::open("/dev/urandom")
                .and_then(|mut file| file.read_exact(bytes))
                .is_ok();
        }),
        windows => ({
            use windows_sys::Win32::Foundation::STATUS_SUCCESS;
            use windows_sys::Win32::Security::Cryptography::{
                BCryptCloseAlgorithmProvider, BCryptGenRandom, BCryptOpenAlgorithmProvider,
                BCRYPT_RNG_ALGORITHM,
            };

            unsafe {
                let mut handle = std::mem::zeroed();
                let status = BCryptOpenAlgorithmProvider(
                    &mut handle,
                    BCRYPT_RNG_ALGORITHM,
                    std::ptr::null(),
                    0,
                );

                if status == STATUS_SUCCESS {
                    let status = BCryptGenRandom(handle, keys.as_mut_ptr().cast(), 16, 0);
                    BCryptCloseAlgorithmProvider(handle, 0);
                    filled = status == STATUS_SUCCESS;
                } else {
                    filled = false;
                }
            }
        })
        _ => ({
            filled = false;
        })
    }

    filled.then_some(keys)
}

fn fallback_keys() -> [u64; 2] {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let marker = 0u8;
    let addr = core::ptr::addr_of!(marker) as usize as u64;

    tracing::warn!("no OS entropy source available, seeding hash keys from the clock");

    [nanos, addr.rotate_left(32) ^ nanos.wrapping_mul(0x9E37_79B9_7F4A_7C15)]
}
