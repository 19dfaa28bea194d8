#[macro_use]
extern crate afl;
extern crate crcfold;

fn main() {
    fuzz!(|data: &[u8]| {
        let split = data.len() / 2;
        let (left, right) = data.split_at(split);

        // One-shot and seed-chained computations must agree for every
        // variant, at every input the fuzzer finds.
        let crc = crcfold::crc32(data, 0);
        assert_eq!(crc, crcfold::crc32(right, crcfold::crc32(left, 0)));

        let crc = crcfold::crc32c(data, 0);
        assert_eq!(crc, crcfold::crc32c(right, crcfold::crc32c(left, 0)));

        let crc = crcfold::crc64_xz(data, 0);
        assert_eq!(crc, crcfold::crc64_xz(right, crcfold::crc64_xz(left, 0)));

        let crc = crcfold::crc64_nvme(data, 0);
        assert_eq!(crc, crcfold::crc64_nvme(right, crcfold::crc64_nvme(left, 0)));
    });
}
