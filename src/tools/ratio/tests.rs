#![cfg(test)]
mod tests {
    use crate::tools::ratio::*;

    fn gcd(a: i64, b: i64) -> i64 {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    #[test]
    fn test_square() {
        let r = classify(1000, 1000);
        assert_eq!(r.fraction, "1:1");
        assert_eq!(r.cinema, "1:1");
    }

    #[test]
    fn test_full_hd() {
        let r = classify(1920, 1080);
        assert_eq!(r.fraction, "16:9");
        assert_eq!(r.cinema, "16:9");
    }

    #[test]
    fn test_non_positive_dimensions() {
        assert_eq!(classify(0, 100), AspectRatio::default());
        assert_eq!(classify(100, 0), AspectRatio::default());
        assert_eq!(classify(-5, 100), AspectRatio::default());
    }

    #[test]
    fn test_scope_and_flat() {
        assert_eq!(classify(1920, 804).cinema, "2.39:1");
        assert_eq!(classify(1998, 1080).cinema, "1.85:1");
        assert_eq!(classify(1440, 1080).cinema, "4:3");
    }

    #[test]
    fn test_off_standard_ratio_is_rounded() {
        // 3.0 is more than 5% away from 2.39
        let r = classify(3000, 1000);
        assert_eq!(r.fraction, "3:1");
        assert_eq!(r.cinema, "3.00:1");

        // 1.5 sits between 1.33 and 1.66, outside both tolerances
        let r = classify(1500, 1000);
        assert_eq!(r.fraction, "3:2");
        assert_eq!(r.cinema, "1.50:1");
    }

    #[test]
    fn test_portrait_ratio() {
        let r = classify(1080, 1350);
        assert_eq!(r.fraction, "4:5");
        assert_eq!(r.cinema, "0.80:1");
    }

    #[test]
    fn test_fraction_is_reduced_and_equal() {
        let dims = [
            (1, 1),
            (7, 3),
            (1920, 1080),
            (4096, 1716),
            (1234, 567),
            (640, 480),
            (2048, 858),
            (999, 1000),
        ];
        for (w, h) in dims {
            let r = classify(w, h);
            let (a, b) = r.fraction.split_once(':').expect("a:b form");
            let a: i64 = a.parse().expect("numeric width");
            let b: i64 = b.parse().expect("numeric height");
            assert_eq!(gcd(a, b), 1, "{w}x{h} -> {}", r.fraction);
            assert_eq!(a * h, b * w, "{w}x{h} -> {}", r.fraction);
        }
    }

    #[test]
    fn test_cinema_label_boundaries() {
        assert_eq!(cinema_label(1.78), "16:9");
        assert_eq!(cinema_label(1.75), "16:9");
        assert_eq!(cinema_label(1.7), "5:3");
        assert_eq!(cinema_label(1.0), "1:1");
        assert_eq!(cinema_label(1.2), "1.20:1");
    }
}
