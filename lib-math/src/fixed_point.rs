/// Scale factor of the Q14 fixed point format the MPU6050 DMP uses for its quaternion output,
/// i.e. `1.0` is represented as `16384`.
/// 
pub const Q14_ONE: f32 = 16384.0;

/// Converts a single Q14 fixed point value into a float.
/// 
#[inline]
pub fn q14_to_f32(value: i16) -> f32 {
    value as f32 / Q14_ONE
}

/// Converts a float into Q14 fixed point, rounding to the nearest representable value. Values
/// outside of the representable range (roughly `-2.0..2.0`) saturate instead of wrapping around.
/// 
#[inline]
pub fn f32_to_q14(value: f32) -> i16 {
    let scaled = libm::roundf(value * Q14_ONE);
    if scaled >= i16::MAX as f32 {
        i16::MAX
    } else if scaled <= i16::MIN as f32 {
        i16::MIN
    } else {
        scaled as i16
    }
}
