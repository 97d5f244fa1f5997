/// Shannon entropy, in bits, of the 256-bin intensity histogram of `values`.
///
/// A uniform strip scores 0. An even split between two intensities scores 1.
pub fn shannon_entropy<I>(values: I) -> f64
where
    I: IntoIterator<Item = u8>,
{
    let mut histogram = [0u32; 256];
    let mut total = 0u32;
    for value in values {
        histogram[usize::from(value)] += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    let mut entropy = 0.0;
    for &count in histogram.iter().filter(|&&count| count > 0) {
        let p = f64::from(count) / total;
        entropy -= p * p.log2();
    }
    entropy
}
