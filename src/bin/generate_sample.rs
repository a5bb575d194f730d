use rust_xlsxwriter::{Workbook, XlsxError};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn digits(&mut self, n: usize) -> String {
        (0..n).map(|_| char::from(b'0' + self.below(10) as u8)).collect()
    }
}

const FAMILY: [&str; 8] = [
    "Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Huỳnh", "Đặng", "Bùi",
];
const MIDDLE: [&str; 6] = ["Văn", "Thị", "Minh", "Đức", "Ngọc", "Quốc"];
const GIVEN: [&str; 8] = ["An", "Bình", "Chi", "Dũng", "Hà", "Lan", "Sơn", "Tuấn"];
const CITIES: [&str; 4] = ["Hà Nội", "TP. Hồ Chí Minh", "Đà Nẵng", "Cần Thơ"];
const VALID_PREFIXES: [&str; 8] = ["090", "091", "098", "086", "070", "032", "056", "099"];
const BAD_PREFIXES: [&str; 3] = ["012", "016", "024"];

/// A phone cell in one of the shapes found in real contact sheets.
fn phone(rng: &mut SimpleRng) -> String {
    let valid = format!("{}{}", rng.pick(&VALID_PREFIXES), rng.digits(7));
    match rng.below(10) {
        0..=4 => valid,
        5 => format!("+84 {} {} {}", &valid[1..3], &valid[3..6], &valid[6..]),
        6 => format!("{}.{}.{}", &valid[..4], &valid[4..7], &valid[7..]),
        7 => format!("{}{}", rng.pick(&BAD_PREFIXES), rng.digits(7)),
        8 => valid[..8].to_string(),
        _ => String::new(),
    }
}

fn main() -> Result<(), XlsxError> {
    let mut rng = SimpleRng::new(42);
    let rows = 200;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Danh sách")?;

    let headers = ["STT", "Họ và tên", "Số điện thoại", "Tỉnh/Thành", "Ghi chú"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for i in 1..=rows {
        let name = format!(
            "{} {} {}",
            rng.pick(&FAMILY),
            rng.pick(&MIDDLE),
            rng.pick(&GIVEN)
        );
        sheet.write_number(i, 0, i as f64)?;
        sheet.write_string(i, 1, name)?;
        let phone = phone(&mut rng);
        if !phone.is_empty() {
            sheet.write_string(i, 2, phone)?;
        }
        sheet.write_string(i, 3, rng.pick(&CITIES))?;
        if rng.below(5) == 0 {
            sheet.write_string(i, 4, "Gọi lại sau")?;
        }
    }

    let output_path = "sample_contacts.xlsx";
    workbook.save(output_path)?;

    println!("Wrote {rows} contacts to {output_path}");
    Ok(())
}
