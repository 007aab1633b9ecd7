use num_complex::Complex64;
use std::f64::consts::PI;

/// Reorder `data` so each index is swapped with its bit-reversed counterpart
///
/// Applying the permutation twice restores the original order.
///
/// # Panics
/// Panics if the length is not a power of two.
pub fn bit_reverse_sort<T>(data: &mut [T]) {
    let n = data.len();
    assert!(
        n.is_power_of_two(),
        "bit reversal length {} is not a power of two",
        n
    );
    if n <= 2 {
        return;
    }

    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if i < j {
            data.swap(i, j);
        }
    }
}

fn transform(data: &mut [Complex64], inverse: bool) {
    let n = data.len();
    assert!(n.is_power_of_two(), "FFT length {} is not a power of two", n);

    bit_reverse_sort(data);

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut m = 2;
    while m <= n {
        let w_m = Complex64::from_polar(1.0, sign * 2.0 * PI / m as f64);
        for k in (0..n).step_by(m) {
            let mut w = Complex64::new(1.0, 0.0);
            for j in 0..m / 2 {
                let t = w * data[k + j + m / 2];
                let u = data[k + j];
                data[k + j] = u + t;
                data[k + j + m / 2] = u - t;
                w *= w_m;
            }
        }
        m <<= 1;
    }

    if inverse {
        let scale = 1.0 / n as f64;
        for v in data.iter_mut() {
            *v *= scale;
        }
    }
}

/// Forward transform in place (iterative radix-2 Cooley-Tukey)
///
/// # Panics
/// Panics if the length is not a power of two.
pub fn fft(data: &mut [Complex64]) {
    transform(data, false);
}

/// Inverse transform in place, scaled by `1 / N`
///
/// # Panics
/// Panics if the length is not a power of two.
pub fn ifft(data: &mut [Complex64]) {
    transform(data, true);
}

/// Copy a real signal into a zero-padded complex buffer of length `size`
///
/// Samples past `size` are dropped.
pub fn to_complex_padded(signal: &[f64], size: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); size];
    for (dst, &src) in out.iter_mut().zip(signal) {
        dst.re = src;
    }
    out
}

/// Linear convolution of two real signals via the FFT
///
/// Output length is `a.len() + b.len() - 1`, or empty if either input is.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let out_len = a.len() + b.len() - 1;
    let size = out_len.next_power_of_two();

    let mut fa = to_complex_padded(a, size);
    let mut fb = to_complex_padded(b, size);
    fft(&mut fa);
    fft(&mut fb);
    for (x, y) in fa.iter_mut().zip(&fb) {
        *x *= y;
    }
    ifft(&mut fa);

    fa.iter().take(out_len).map(|c| c.re).collect()
}
